//! Integration tests for partials

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Command isolated from the user's config and state directories
    fn partials(home: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("partials");
        cmd.env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join("config"))
            .env("XDG_STATE_HOME", home.join("state"))
            .env_remove("PARTIALS_CONFIG");
        cmd
    }

    fn site(temp: &TempDir) -> std::path::PathBuf {
        let site = temp.path().join("site");
        fs::create_dir_all(site.join("partials")).unwrap();
        fs::write(site.join("partials/header.html"), "<header>H</header>").unwrap();
        fs::write(
            site.join("index.html"),
            r#"<body><div data-include="/partials/header.html"></div><main>Home</main></body>"#,
        )
        .unwrap();
        site
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        partials(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("HTML partial includes"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        partials(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("partials"));
    }

    #[test]
    fn render_from_site_root() {
        let temp = TempDir::new().unwrap();
        let site = site(&temp);

        partials(temp.path())
            .args(["render", "--no-cache", "--root"])
            .arg(&site)
            .arg(site.join("index.html"))
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"data-render-source="network"><header>H</header></div>"#,
            ))
            .stderr(predicate::str::contains("1 network"));
    }

    #[test]
    fn render_falls_back_to_session_cache() {
        let temp = TempDir::new().unwrap();
        let site = site(&temp);

        partials(temp.path())
            .args(["render", "--session", "it", "--root"])
            .arg(&site)
            .arg(site.join("index.html"))
            .assert()
            .success();

        fs::remove_file(site.join("partials/header.html")).unwrap();

        partials(temp.path())
            .args(["render", "--session", "it", "--report", "plain", "--root"])
            .arg(&site)
            .arg(site.join("index.html"))
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"data-cache-applied="true" data-render-source="cache"><header>H</header>"#,
            ))
            .stdout(predicate::str::contains("data-load-error").not())
            .stderr(predicate::str::contains("/partials/header.html\tcache"));

        partials(temp.path())
            .args(["cache", "list", "--format", "plain", "--session", "it"])
            .assert()
            .success()
            .stdout(predicate::str::contains("partials:/partials/header.html"));
    }

    #[test]
    fn render_without_source_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        let site = site(&temp);

        partials(temp.path())
            .arg("render")
            .arg(site.join("index.html"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("No fragment source configured"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn render_rejects_session_outside_state_dir() {
        let temp = TempDir::new().unwrap();
        let site = site(&temp);

        partials(temp.path())
            .args(["render", "--session", "../../escape", "--root"])
            .arg(&site)
            .arg(site.join("index.html"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid session name"));
        assert!(!temp.path().join("escape.json").exists());
    }

    #[test]
    fn cache_clear_recovers_corrupt_session() {
        let temp = TempDir::new().unwrap();
        let output = partials(temp.path())
            .args(["cache", "path"])
            .output()
            .unwrap();
        let session_file = std::path::PathBuf::from(String::from_utf8(output.stdout).unwrap().trim());
        fs::create_dir_all(session_file.parent().unwrap()).unwrap();
        fs::write(&session_file, "{ truncated").unwrap();

        partials(temp.path())
            .args(["cache", "clear"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 0 cached fragment(s)"));
        assert!(!session_file.exists());
    }

    #[test]
    fn render_missing_page() {
        let temp = TempDir::new().unwrap();
        partials(temp.path())
            .args(["render", "--root", ".", "nonexistent.html"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }

    #[test]
    fn cache_list_empty() {
        let temp = TempDir::new().unwrap();
        partials(temp.path())
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached fragments"));
    }

    #[test]
    fn cache_clear_empty_session() {
        let temp = TempDir::new().unwrap();
        partials(temp.path())
            .args(["cache", "clear"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 0 cached fragment(s)"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        partials(temp.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[loader]"));
    }

    #[test]
    fn config_path_override() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        partials(temp.path())
            .args(["config", "path", "--config"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn completions_bash() {
        let temp = TempDir::new().unwrap();
        partials(temp.path())
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("partials"));
    }
}
