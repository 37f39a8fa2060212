use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

/// A resolver script that records its argument count and first argument
/// in `args.txt` next to itself, then prints `output`.
fn fake_resolver(dir: &Path, output: &str, status: i32) -> PathBuf {
    let script = dir.join("resolver.sh");
    fs::write(
        &script,
        format!(
            "printf '%s\\n' \"$#\" \"$1\" > \"$(dirname \"$0\")/args.txt\"\nprintf '%s' '{}'\nexit {}\n",
            output, status
        ),
    )
    .unwrap();
    script
}

fn recorded_args(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("args.txt"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn vcsurl(script: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vcsurl"));
    cmd.env_remove("VCSURL_RESOLVER")
        .env_remove("VCSURL_LOG")
        .arg("--resolver")
        .arg("sh")
        .arg("--resolver-arg")
        .arg(script);
    cmd
}

#[test]
fn buffer_passes_path_as_one_argument() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "https://example.com/x/y extra text\n", 0);
    let file = temp.path().join("dir with space/a b;$(touch pwned).rs");

    vcsurl(&script)
        .arg("buffer")
        .arg("--file")
        .arg(&file)
        .assert()
        .success()
        .stdout("https://example.com/x/y\n");

    assert_eq!(
        recorded_args(temp.path()),
        vec!["1".to_string(), file.display().to_string()]
    );
    assert!(!temp.path().join("pwned").exists());
}

#[test]
fn region_sends_line_range() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "https://example.com/r", 0);
    let file = temp.path().join("src/lib.rs");

    vcsurl(&script)
        .args(["region", "--from", "10", "--to", "16:0", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout("https://example.com/r\n");

    assert_eq!(
        recorded_args(temp.path())[1],
        format!("{}:10,15", file.display())
    );
}

#[test]
fn region_without_file_fails() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "https://example.com/r", 0);

    vcsurl(&script)
        .current_dir(temp.path())
        .args(["region", "--from", "1", "--to", "3"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("no backing file"));

    assert!(!temp.path().join("args.txt").exists());
}

#[test]
fn point_classifies_object_id() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "https://example.com/commit", 0);

    vcsurl(&script)
        .args(["point", "--file", "/r/a.rs", "--token", "deadbe"])
        .assert()
        .success();
    assert_eq!(recorded_args(temp.path())[1], "deadbe");

    vcsurl(&script)
        .args(["point", "--file", "/r/a.rs", "--token", "deadbeefg"])
        .assert()
        .success();
    assert_eq!(recorded_args(temp.path())[1], "/r/a.rs");
}

#[test]
fn run_dwim_prefers_region() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "https://example.com/r", 0);

    vcsurl(&script)
        .args([
            "run",
            "vcs-url-dwim",
            "--file",
            "/r/a.rs",
            "--token",
            "deadbeef",
            "--from",
            "3:4",
            "--to",
            "5:1",
        ])
        .assert()
        .success();

    assert_eq!(recorded_args(temp.path())[1], "/r/a.rs:3,5");
}

#[test]
fn run_unknown_command_fails() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "https://example.com/r", 0);

    vcsurl(&script)
        .args(["run", "vcs-url-nope", "--file", "/r/a.rs"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown command: vcs-url-nope"));
}

#[test]
fn word_is_passed_verbatim() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "https://example.com/search", 0);

    vcsurl(&script)
        .args(["word", "parse_origin"])
        .assert()
        .success()
        .stdout("https://example.com/search\n");

    assert_eq!(recorded_args(temp.path()), vec!["1", "parse_origin"]);
}

#[test]
fn empty_output_fails() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "  \n", 0);

    vcsurl(&script)
        .args(["buffer", "--file", "/r/a.rs"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("produced no output"));
}

#[test]
fn non_zero_exit_fails_unless_ignored() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "https://example.com/late", 3);

    vcsurl(&script)
        .args(["buffer", "--file", "/r/a.rs"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("exited with status 3"));

    vcsurl(&script)
        .args(["--no-check-status", "buffer", "--file", "/r/a.rs"])
        .assert()
        .success()
        .stdout("https://example.com/late\n");
}

#[test]
fn missing_resolver_fails() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("no-such-resolver");

    Command::new(assert_cmd::cargo::cargo_bin!("vcsurl"))
        .arg("--resolver")
        .arg(&missing)
        .args(["buffer", "--file", "/r/a.rs"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn jsonl_output_describes_locator() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "https://example.com/r", 0);

    let assert = vcsurl(&script)
        .args([
            "--format", "jsonl", "region", "--file", "/r/a.rs", "--from", "2", "--to", "4",
        ])
        .assert()
        .success();

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "url");
    assert_eq!(items[0]["locator"], "/r/a.rs:2,3");
    assert_eq!(items[0]["locator_kind"], "line_range");
    assert_eq!(items[0]["range"]["start"], 2);
    assert_eq!(items[0]["range"]["end"], 3);
    assert_eq!(items[0]["url"], "https://example.com/r");
    assert_eq!(items[0]["meta"]["resolver"], "sh");
}

#[test]
fn jsonl_output_reports_error_code() {
    let temp = tempdir().unwrap();
    let script = fake_resolver(temp.path(), "", 0);

    let assert = vcsurl(&script)
        .args(["--format", "jsonl", "buffer", "--file", "/r/a.rs"])
        .assert()
        .code(1);

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["kind"], "error");
    assert_eq!(items[0]["errors"][0]["code"], "EMPTY_OUTPUT");
}

#[test]
fn commands_lists_command_table() {
    Command::new(assert_cmd::cargo::cargo_bin!("vcsurl"))
        .arg("commands")
        .assert()
        .success()
        .stdout(predicate::str::contains("vcs-url-buffer\t"))
        .stdout(predicate::str::contains("vcs-url-dwim\t"));
}

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .current_dir(dir)
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .output()
        .unwrap()
        .status;
    assert!(status.success(), "git {:?} failed", args);
}

fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "git {:?} failed", args);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A committed working copy on `main` with a GitHub origin
fn github_repo() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let dir = temp.path();
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("src/lib.rs"), "one\ntwo\nthree\nfour\n").unwrap();

    git(dir, &["init", "-q"]);
    git(dir, &["checkout", "-q", "-b", "main"]);
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", "init"]);
    git(
        dir,
        &["remote", "add", "origin", "git@github.com:user/repo.git"],
    );
    temp
}

#[test]
fn vcs_resolve_links_line_range_on_github() {
    if !git_available() {
        return;
    }
    let repo = github_repo();

    Command::new(assert_cmd::cargo::cargo_bin!("vcs-resolve"))
        .current_dir(repo.path())
        .arg("src/lib.rs:2,3")
        .assert()
        .success()
        .stdout("https://github.com/user/repo/blob/main/src/lib.rs#L2-L3\n");
}

#[test]
fn vcs_resolve_links_directory_and_word() {
    if !git_available() {
        return;
    }
    let repo = github_repo();

    Command::new(assert_cmd::cargo::cargo_bin!("vcs-resolve"))
        .current_dir(repo.path())
        .arg(repo.path().join("src"))
        .assert()
        .success()
        .stdout("https://github.com/user/repo/tree/main/src\n");

    Command::new(assert_cmd::cargo::cargo_bin!("vcs-resolve"))
        .current_dir(repo.path())
        .arg("frobnicate")
        .assert()
        .success()
        .stdout("https://github.com/user/repo/search?q=frobnicate\n");
}

#[test]
fn vcs_resolve_outside_repository_fails() {
    if !git_available() {
        return;
    }
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.txt"), "a").unwrap();

    Command::new(assert_cmd::cargo::cargo_bin!("vcs-resolve"))
        .current_dir(temp.path())
        .env("GIT_CEILING_DIRECTORIES", temp.path().parent().unwrap())
        .arg(temp.path().join("a.txt"))
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn client_and_builtin_resolver_agree() {
    if !git_available() {
        return;
    }
    let repo = github_repo();
    let file = repo.path().join("src/lib.rs");

    Command::new(assert_cmd::cargo::cargo_bin!("vcsurl"))
        .current_dir(repo.path())
        .arg("--resolver")
        .arg(assert_cmd::cargo::cargo_bin!("vcs-resolve"))
        .args(["region", "--from", "1", "--to", "3:0", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout("https://github.com/user/repo/blob/main/src/lib.rs#L1-L2\n");

    Command::new(assert_cmd::cargo::cargo_bin!("vcsurl"))
        .current_dir(repo.path())
        .args(["resolve", "src/lib.rs", "--rev", "v1.0"])
        .assert()
        .success()
        .stdout("https://github.com/user/repo/blob/v1.0/src/lib.rs\n");
}

#[test]
fn vcs_resolve_takes_flag_like_word_verbatim() {
    if !git_available() {
        return;
    }
    let repo = github_repo();

    for word in ["-v", "--copy"] {
        Command::new(assert_cmd::cargo::cargo_bin!("vcs-resolve"))
            .current_dir(repo.path())
            .arg(word)
            .assert()
            .success()
            .stdout(format!("https://github.com/user/repo/search?q={}\n", word));
    }
}

#[test]
fn vcs_resolve_links_commit_on_detached_head() {
    if !git_available() {
        return;
    }
    let repo = github_repo();
    git(repo.path(), &["checkout", "-q", "--detach"]);
    let head = git_stdout(repo.path(), &["rev-parse", "HEAD"]);

    Command::new(assert_cmd::cargo::cargo_bin!("vcs-resolve"))
        .current_dir(repo.path())
        .arg("src/lib.rs")
        .assert()
        .success()
        .stdout(format!(
            "https://github.com/user/repo/blob/{}/src/lib.rs\n",
            head
        ));
}

