//! Best-effort resolution of application names
//!
//! Every lookup here is macOS-specific: Homebrew casks, the `/Applications`
//! folder and the Spotlight index. On other hosts the strategies simply miss
//! and the caller's name is returned unchanged. Nothing in this module fails.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::runner::{CommandRunner, ExecutionResult};

const APP_BUNDLE_SUFFIX: &str = ".app";

/// One way of turning an application name fragment into a better name
#[async_trait]
pub trait LookupStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, app_name: &str) -> Option<String>;
}

/// Try each strategy in order, stopping at the first hit
pub async fn first_hit(strategies: &[Box<dyn LookupStrategy>], app_name: &str) -> Option<String> {
    for strategy in strategies {
        if let Some(found) = strategy.lookup(app_name).await {
            debug!("{} resolved '{}' to '{}'", strategy.name(), app_name, found);
            return Some(found);
        }
        debug!("{} found nothing for '{}'", strategy.name(), app_name);
    }
    None
}

/// Quote for POSIX shells
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

async fn run_quiet(runner: &dyn CommandRunner, command: &str) -> Option<ExecutionResult> {
    match runner.run(command, None).await {
        Ok(result) if result.success() => Some(result),
        Ok(result) => {
            debug!("'{}' exited with {}", command, result.exit_status);
            None
        }
        Err(e) => {
            debug!("'{}' could not be launched: {}", command, e);
            None
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn bundle_display_name(path: &str) -> String {
    let base = Path::new(path.trim())
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.trim().to_string());
    base.strip_suffix(APP_BUNDLE_SUFFIX).unwrap_or(&base).to_string()
}

/// Confirms the name against `brew list --cask`
pub struct InstalledCaskList {
    runner: Arc<dyn CommandRunner>,
}

#[async_trait]
impl LookupStrategy for InstalledCaskList {
    fn name(&self) -> &str {
        "installed casks"
    }

    async fn lookup(&self, app_name: &str) -> Option<String> {
        let result = run_quiet(self.runner.as_ref(), "brew list --cask").await?;
        result
            .stdout
            .lines()
            .any(|line| contains_ignore_case(line, app_name))
            .then(|| app_name.to_string())
    }
}

/// Searches the Homebrew catalog, by name or by description
pub struct BrewSearch {
    runner: Arc<dyn CommandRunner>,
    by_description: bool,
}

impl BrewSearch {
    /// Last `/` segment of the first line that mentions a cask
    fn parse(stdout: &str) -> Option<String> {
        stdout
            .lines()
            .find(|line| line.to_lowercase().contains("cask"))
            .and_then(|line| line.rsplit('/').next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

#[async_trait]
impl LookupStrategy for BrewSearch {
    fn name(&self) -> &str {
        if self.by_description {
            "brew search --desc"
        } else {
            "brew search"
        }
    }

    async fn lookup(&self, app_name: &str) -> Option<String> {
        let command = format!("{} {}", self.name(), shell_quote(app_name));
        let result = run_quiet(self.runner.as_ref(), &command).await?;
        Self::parse(&result.stdout)
    }
}

/// Scans the applications folder one level deep
pub struct ApplicationsDirScan {
    dir: PathBuf,
}

#[async_trait]
impl LookupStrategy for ApplicationsDirScan {
    fn name(&self) -> &str {
        "applications folder"
    }

    async fn lookup(&self, app_name: &str) -> Option<String> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.ok()?;
        let mut matches = Vec::new();

        while let Ok(Some(entry)) = entries.next_entry().await {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            let file_name = entry.file_name().to_string_lossy().to_string();
            if is_dir && contains_ignore_case(&file_name, app_name) {
                matches.push(file_name);
            }
        }

        // Directory order is unspecified; pick deterministically.
        matches.sort();
        matches.first().map(|name| bundle_display_name(name))
    }
}

/// Asks Spotlight for every indexed application
pub struct SpotlightQuery {
    runner: Arc<dyn CommandRunner>,
}

#[async_trait]
impl LookupStrategy for SpotlightQuery {
    fn name(&self) -> &str {
        "spotlight"
    }

    async fn lookup(&self, app_name: &str) -> Option<String> {
        let result = run_quiet(self.runner.as_ref(), "mdfind 'kMDItemKind==Application'").await?;
        result
            .stdout
            .lines()
            .find(|line| contains_ignore_case(line, app_name))
            .map(bundle_display_name)
    }
}

/// Resolves application names and removes installed applications
#[derive(Clone)]
pub struct AppLocator {
    runner: Arc<dyn CommandRunner>,
    applications_dir: PathBuf,
}

impl AppLocator {
    pub fn new(runner: Arc<dyn CommandRunner>, applications_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            applications_dir: applications_dir.into(),
        }
    }

    fn cask_strategies(&self, is_uninstall: bool) -> Vec<Box<dyn LookupStrategy>> {
        let mut strategies: Vec<Box<dyn LookupStrategy>> = Vec::new();
        if is_uninstall {
            strategies.push(Box::new(InstalledCaskList {
                runner: self.runner.clone(),
            }));
        }
        strategies.push(Box::new(BrewSearch {
            runner: self.runner.clone(),
            by_description: false,
        }));
        strategies.push(Box::new(BrewSearch {
            runner: self.runner.clone(),
            by_description: true,
        }));
        strategies
    }

    fn installed_strategies(&self) -> Vec<Box<dyn LookupStrategy>> {
        vec![
            Box::new(ApplicationsDirScan {
                dir: self.applications_dir.clone(),
            }),
            Box::new(SpotlightQuery {
                runner: self.runner.clone(),
            }),
        ]
    }

    /// Best guess at the Homebrew cask identifier for `app_name`
    pub async fn resolve_cask(&self, app_name: &str, is_uninstall: bool) -> String {
        first_hit(&self.cask_strategies(is_uninstall), app_name)
            .await
            .unwrap_or_else(|| app_name.to_string())
    }

    /// Display name of an installed application matching `app_name`
    pub async fn find_installed(&self, app_name: &str) -> String {
        first_hit(&self.installed_strategies(), app_name)
            .await
            .unwrap_or_else(|| app_name.to_string())
    }

    /// Remove an application: Homebrew first, then the bundle itself.
    pub async fn uninstall(&self, app_name: &str) -> String {
        let brew = format!("brew uninstall --cask {}", shell_quote(app_name));
        if let Some(result) = run_quiet(self.runner.as_ref(), &brew).await {
            return format!("Application uninstalled with Homebrew: {}", result.stdout.trim());
        }

        let bundle = self
            .applications_dir
            .join(format!("{}{}", app_name, APP_BUNDLE_SUFFIX));
        if !bundle.exists() {
            return "Application not found".to_string();
        }

        let remove = format!("sudo rm -rf {}", shell_quote(&bundle.to_string_lossy()));
        match self.runner.run(&remove, None).await {
            Ok(result) if result.success() => "Application removed manually".to_string(),
            Ok(result) => format!("Manual removal failed: {}", result.stderr.trim()),
            Err(e) => format!("Manual removal failed: {}", e),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers commands from a fixed table; anything else exits 1.
    #[derive(Default)]
    pub(crate) struct ScriptedRunner {
        pub(crate) responses: HashMap<String, ExecutionResult>,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        pub(crate) fn respond(mut self, command: &str, stdout: &str, exit_status: i32) -> Self {
            self.responses.insert(
                command.to_string(),
                ExecutionResult {
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                    exit_status,
                },
            );
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(&self, command: &str, _working_dir: Option<&Path>) -> std::io::Result<ExecutionResult> {
            self.calls.lock().unwrap().push(command.to_string());
            Ok(self.responses.get(command).cloned().unwrap_or(ExecutionResult {
                stdout: String::new(),
                stderr: format!("{}: not scripted", command),
                exit_status: 1,
            }))
        }
    }

    fn locator(runner: ScriptedRunner, dir: &Path) -> (AppLocator, Arc<ScriptedRunner>) {
        let runner = Arc::new(runner);
        (AppLocator::new(runner.clone(), dir), runner)
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("Google Chrome"), "'Google Chrome'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_brew_search_parse() {
        let out = "==> Formulae\nfirefoxpwa\n==> Casks\nhomebrew/cask/firefox\n";
        assert_eq!(BrewSearch::parse(out), Some("firefox".to_string()));
        assert_eq!(BrewSearch::parse("==> Formulae\nwget\n"), None);
    }

    #[tokio::test]
    async fn test_resolve_cask_uninstall_trusts_installed_name() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::default().respond("brew list --cask", "slack\nzoom\n", 0);
        let (locator, runner) = locator(runner, dir.path());

        assert_eq!(locator.resolve_cask("Zoom", true).await, "Zoom");
        assert_eq!(runner.calls(), vec!["brew list --cask"]);
    }

    #[tokio::test]
    async fn test_resolve_cask_search_then_desc() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::default()
            .respond("brew search 'chrome'", "==> Formulae\nchromedriver\n", 0)
            .respond(
                "brew search --desc 'chrome'",
                "==> Casks\nhomebrew/cask/google-chrome: Web browser\n",
                0,
            );
        let (locator, runner) = locator(runner, dir.path());

        assert_eq!(locator.resolve_cask("chrome", false).await, "google-chrome: Web browser");
        assert_eq!(
            runner.calls(),
            vec!["brew search 'chrome'", "brew search --desc 'chrome'"]
        );
    }

    #[tokio::test]
    async fn test_resolve_cask_falls_back_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let (locator, _) = locator(ScriptedRunner::default(), dir.path());
        assert_eq!(locator.resolve_cask("mystery", true).await, "mystery");
    }

    #[tokio::test]
    async fn test_find_installed_in_applications_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Google Chrome.app")).unwrap();
        std::fs::create_dir(dir.path().join("Safari.app")).unwrap();
        std::fs::write(dir.path().join("chrome-notes.txt"), "").unwrap();
        let (locator, runner) = locator(ScriptedRunner::default(), dir.path());

        assert_eq!(locator.find_installed("chrome").await, "Google Chrome");
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_find_installed_via_spotlight() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::default().respond(
            "mdfind 'kMDItemKind==Application'",
            "/System/Applications/Notes.app\n/Users/me/Apps/Visual Studio Code.app\n",
            0,
        );
        let (locator, _) = locator(runner, dir.path());

        assert_eq!(locator.find_installed("studio").await, "Visual Studio Code");
    }

    #[tokio::test]
    async fn test_find_installed_falls_back_to_input() {
        let (locator, _) = locator(ScriptedRunner::default(), Path::new("/no/such/dir"));
        assert_eq!(locator.find_installed("chrome").await, "chrome");
    }

    #[tokio::test]
    async fn test_uninstall_with_brew() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::default().respond(
            "brew uninstall --cask 'Google Chrome'",
            "==> Uninstalling Cask google-chrome\n",
            0,
        );
        let (locator, _) = locator(runner, dir.path());

        let message = locator.uninstall("Google Chrome").await;
        assert!(message.starts_with("Application uninstalled with Homebrew"));
    }

    #[tokio::test]
    async fn test_uninstall_manual_removal() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Google Chrome.app");
        std::fs::create_dir(&bundle).unwrap();
        let remove = format!("sudo rm -rf {}", shell_quote(&bundle.to_string_lossy()));
        let runner = ScriptedRunner::default().respond(&remove, "", 0);
        let (locator, runner) = locator(runner, dir.path());

        assert_eq!(locator.uninstall("Google Chrome").await, "Application removed manually");
        assert_eq!(runner.calls().last(), Some(&remove));
    }

    #[tokio::test]
    async fn test_uninstall_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (locator, _) = locator(ScriptedRunner::default(), dir.path());
        assert_eq!(locator.uninstall("Ghost").await, "Application not found");
    }
}
