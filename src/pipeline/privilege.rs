//! Elevation-prefix normalization for package-manager invocations
//!
//! Linux package managers need root to install; Homebrew refuses to run as
//! root. The rules below are a static table keyed by substring, checked in
//! order, first match wins.

pub const ELEVATION_PREFIX: &str = "sudo ";

/// What a matching rule does to the command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// Prefix with `sudo ` unless already present
    Require,
    /// Remove any leading `sudo `
    Forbid,
}

#[derive(Debug, Clone, Copy)]
pub struct PrivilegeRule {
    /// Lowercase substring that selects this rule
    pub pattern: &'static str,
    pub elevation: Elevation,
}

const fn rule(pattern: &'static str, elevation: Elevation) -> PrivilegeRule {
    PrivilegeRule { pattern, elevation }
}

pub const DEFAULT_RULES: &[PrivilegeRule] = &[
    rule("apt install", Elevation::Require),
    rule("apt-get install", Elevation::Require),
    rule("dnf install", Elevation::Require),
    rule("yum install", Elevation::Require),
    rule("zypper install", Elevation::Require),
    rule("brew install", Elevation::Forbid),
];

#[derive(Debug, Clone)]
pub struct PrivilegeNormalizer {
    rules: &'static [PrivilegeRule],
}

impl PrivilegeNormalizer {
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES)
    }

    pub fn with_rules(rules: &'static [PrivilegeRule]) -> Self {
        Self { rules }
    }

    /// Return the first rule whose pattern occurs in `command`
    pub fn matching_rule(&self, command: &str) -> Option<&PrivilegeRule> {
        let lowered = command.to_lowercase();
        self.rules.iter().find(|r| lowered.contains(r.pattern))
    }

    pub fn normalize(&self, command: &str) -> String {
        match self.matching_rule(command).map(|r| r.elevation) {
            Some(Elevation::Require) if !has_prefix(command) => {
                format!("{}{}", ELEVATION_PREFIX, command)
            }
            Some(Elevation::Forbid) => strip_prefix(command).to_string(),
            _ => command.to_string(),
        }
    }
}

impl Default for PrivilegeNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn has_prefix(command: &str) -> bool {
    command.trim_start().starts_with(ELEVATION_PREFIX)
}

fn strip_prefix(command: &str) -> &str {
    let mut rest = command.trim_start();
    while let Some(stripped) = rest.strip_prefix(ELEVATION_PREFIX) {
        rest = stripped.trim_start();
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_installers_get_prefix() {
        let normalizer = PrivilegeNormalizer::new();
        assert_eq!(normalizer.normalize("apt install foo"), "sudo apt install foo");
        assert_eq!(normalizer.normalize("DNF Install vim"), "sudo DNF Install vim");
        assert_eq!(normalizer.normalize("yum install -y git"), "sudo yum install -y git");
    }

    #[test]
    fn test_prefix_not_doubled() {
        let normalizer = PrivilegeNormalizer::new();
        assert_eq!(normalizer.normalize("sudo apt install foo"), "sudo apt install foo");
    }

    #[test]
    fn test_brew_prefix_removed() {
        let normalizer = PrivilegeNormalizer::new();
        assert_eq!(normalizer.normalize("sudo brew install foo"), "brew install foo");
        assert_eq!(
            normalizer.normalize("sudo sudo brew install --cask firefox"),
            "brew install --cask firefox"
        );
        assert_eq!(
            normalizer.normalize("brew install --cask google-chrome"),
            "brew install --cask google-chrome"
        );
    }

    #[test]
    fn test_unrelated_commands_unchanged() {
        let normalizer = PrivilegeNormalizer::new();
        assert_eq!(normalizer.normalize("ls -la"), "ls -la");
        assert_eq!(normalizer.normalize("sudo ls /root"), "sudo ls /root");
        assert_eq!(normalizer.normalize("brew uninstall foo"), "brew uninstall foo");
    }

    #[test]
    fn test_first_rule_wins() {
        // Both patterns appear; the Linux rule is listed first.
        let normalizer = PrivilegeNormalizer::new();
        assert_eq!(
            normalizer.normalize("apt install x && brew install y"),
            "sudo apt install x && brew install y"
        );
    }

    #[test]
    fn test_custom_rules() {
        const RULES: &[PrivilegeRule] = &[rule("pacman -s", Elevation::Require)];
        let normalizer = PrivilegeNormalizer::with_rules(RULES);
        assert_eq!(normalizer.normalize("pacman -S htop"), "sudo pacman -S htop");
        assert_eq!(normalizer.normalize("apt install foo"), "apt install foo");
    }
}
