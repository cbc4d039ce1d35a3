use std::path::{Path, PathBuf};
use std::process::Command;

const MAX_LINES: usize = 750;

const CHECKED_EXTENSIONS: &[&str] = &["rs", "md", "yaml", "toml"];

// `examples` holds reference material that is not part of the crate.
const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules", "examples"];

const EXCLUDED_FILES: &[&str] = &["Cargo.lock"];

type Violations = Vec<(PathBuf, Vec<(usize, String)>)>;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/main");
    println!("cargo:rerun-if-changed=.git/packed-refs");

    let sha = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=INTERVIEW_COACH_GIT_SHA={}", sha);

    let root = PathBuf::from(
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set"),
    );
    let files = collect_files_to_check(&root);
    for file in &files {
        println!("cargo:rerun-if-changed={}", file.display());
    }
    let rust_files: Vec<&PathBuf> = files
        .iter()
        .filter(|p| {
            p.extension().and_then(|e| e.to_str()) == Some("rs")
                && p.file_name().and_then(|n| n.to_str()) != Some("build.rs")
        })
        .collect();

    enforce_line_limits(&root, &files);
    enforce_no_dead_code_allows(&root, &rust_files);
    enforce_no_test_skips(&root, &rust_files);
    enforce_no_nested_runtimes(&root, &rust_files);
    enforce_serial_for_env_mutations(&root, &rust_files);
}

fn enforce_line_limits(root: &Path, files: &[PathBuf]) {
    let mut violations = Vec::new();
    for file in files {
        let rel_path = file.strip_prefix(root).unwrap_or(file);
        match std::fs::read_to_string(file) {
            Ok(content) => {
                let line_count = content
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .count();
                if line_count > MAX_LINES {
                    violations.push((rel_path.to_path_buf(), line_count));
                }
            }
            Err(e) => println!(
                "cargo:warning=Could not read file {}: {}",
                rel_path.display(),
                e
            ),
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("FILE LINE LIMIT EXCEEDED (max {} lines)", MAX_LINES);
        eprintln!("========================================");
        for (path, lines) in &violations {
            eprintln!(
                "  {} - {} lines (exceeds by {})",
                path.display(),
                lines,
                lines - MAX_LINES
            );
        }
        eprintln!("========================================\n");
        eprintln!("Please split these files into smaller modules.\n");
        panic!(
            "Build failed: {} file(s) exceed the {} line limit",
            violations.len(),
            MAX_LINES
        );
    }
}

fn collect_files_to_check(root: &Path) -> Vec<PathBuf> {
    let listed = Command::new("git")
        .args(["ls-files"])
        .current_dir(root)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok());

    let mut files = Vec::new();
    match listed {
        Some(stdout) if !stdout.trim().is_empty() => {
            for line in stdout.lines() {
                let path = root.join(line);
                if should_check_file(&path, root) {
                    files.push(path);
                }
            }
        }
        _ => walk_directory(root, root, &mut files),
    }
    files
}

fn walk_directory(dir: &Path, root: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let excluded = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| EXCLUDED_DIRS.contains(&name));
            if !excluded {
                walk_directory(&path, root, files);
            }
        } else if should_check_file(&path, root) {
            files.push(path);
        }
    }
}

fn should_check_file(path: &Path, root: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e,
        None => return false,
    };
    if !CHECKED_EXTENSIONS.contains(&ext) {
        return false;
    }

    if let Ok(rel_path) = path.strip_prefix(root) {
        let rel_str = rel_path.to_string_lossy();
        if EXCLUDED_FILES.iter().any(|excluded| rel_str == *excluded) {
            return false;
        }
        let in_excluded_dir = rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
        });
        if in_excluded_dir {
            return false;
        }
    }

    true
}

/// Walks every `#[test]` / `#[tokio::test]` body, calling `check` per line
/// with the test name and the current brace depth. Returning `Some(msg)`
/// records a violation and stops checking that test.
fn scan_test_bodies(
    root: &Path,
    rust_files: &[&PathBuf],
    mut check: impl FnMut(&str, &str, usize, bool) -> Option<String>,
) -> Violations {
    let mut violations = Vec::new();

    for file in rust_files {
        let Ok(content) = std::fs::read_to_string(file) else {
            continue;
        };
        let lines: Vec<&str> = content.lines().collect();
        let mut file_violations = Vec::new();

        let mut in_test_fn = false;
        let mut has_serial = false;
        let mut test_fn_start = 0;
        let mut test_fn_name = String::new();
        let mut brace_depth: i32 = 0;

        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();

            if trimmed == "#[serial]" || trimmed == "#[serial_test::serial]" {
                has_serial = true;
            }

            if trimmed == "#[test]" || trimmed.starts_with("#[tokio::test") {
                let fn_line = lines
                    .iter()
                    .skip(i + 1)
                    .take(4)
                    .find(|candidate| candidate.contains("fn "));
                if let Some(fn_line) = fn_line {
                    test_fn_start = i + 1;
                    test_fn_name = fn_line
                        .split("fn ")
                        .nth(1)
                        .and_then(|rest| rest.split('(').next())
                        .unwrap_or_default()
                        .trim()
                        .to_string();
                    in_test_fn = true;
                    brace_depth = 0;
                }
            }

            if !in_test_fn {
                continue;
            }

            for c in line.chars() {
                if c == '{' {
                    brace_depth += 1;
                } else if c == '}' {
                    brace_depth -= 1;
                    if brace_depth == 0 {
                        in_test_fn = false;
                    }
                }
            }

            let depth = usize::try_from(brace_depth).unwrap_or(0);
            if let Some(message) = check(&test_fn_name, trimmed, depth, has_serial) {
                file_violations.push((test_fn_start, message));
                in_test_fn = false;
            }
            if !in_test_fn {
                has_serial = false;
            }
        }

        if !file_violations.is_empty() {
            let rel_path = file.strip_prefix(root).unwrap_or(file).to_path_buf();
            violations.push((rel_path, file_violations));
        }
    }

    violations
}

fn scan_lines(
    root: &Path,
    rust_files: &[&PathBuf],
    mut check: impl FnMut(&[&str], usize) -> bool,
) -> Violations {
    let mut violations = Vec::new();
    for file in rust_files {
        let Ok(content) = std::fs::read_to_string(file) else {
            continue;
        };
        let lines: Vec<&str> = content.lines().collect();
        let file_violations: Vec<(usize, String)> = (0..lines.len())
            .filter(|&i| check(&lines, i))
            .map(|i| (i + 1, lines[i].trim().to_string()))
            .collect();
        if !file_violations.is_empty() {
            let rel_path = file.strip_prefix(root).unwrap_or(file).to_path_buf();
            violations.push((rel_path, file_violations));
        }
    }
    violations
}

fn fail_with(violations: &Violations, title: &str, advice: &[&str], summary: &str) {
    if violations.is_empty() {
        return;
    }
    let total_count: usize = violations.iter().map(|(_, v)| v.len()).sum();

    eprintln!("\n========================================");
    eprintln!("{}", title);
    eprintln!("========================================\n");
    for (path, lines) in violations {
        for (line_num, message) in lines {
            eprintln!("  {}:{}", path.display(), line_num);
            eprintln!("    {}\n", message);
        }
    }
    eprintln!("========================================\n");
    for line in advice {
        eprintln!("{}", line);
    }
    eprintln!("\n========================================\n");
    panic!("Build failed: {} {}", total_count, summary);
}

fn enforce_no_dead_code_allows(root: &Path, rust_files: &[&PathBuf]) {
    let violations = scan_lines(root, rust_files, |lines, i| {
        let trimmed = lines[i].trim();
        (trimmed.starts_with("#[allow(") || trimmed.starts_with("#![allow("))
            && trimmed.contains("dead_code")
    });
    fail_with(
        &violations,
        "#[allow(dead_code)] IS NOT ALLOWED",
        &[
            "Do NOT use #[allow(dead_code)] to silence warnings.",
            "  - DELETE unused code entirely",
            "  - If the code is for tests, use #[cfg(test)]",
        ],
        "#[allow(dead_code)] occurrence(s) found. Remove the dead code.",
    );
}

/// Tests that return early without doing work hide failures. A test that
/// cannot run must fail.
fn enforce_no_test_skips(root: &Path, rust_files: &[&PathBuf]) {
    const SKIP_PATTERNS: &[&str] = &[
        "Skipping test",
        "skipping test",
        "Test skipped",
        "test skipped",
        "backend not available",
    ];

    let violations = scan_test_bodies(root, rust_files, |name, trimmed, depth, _| {
        if let Some(pattern) = SKIP_PATTERNS.iter().find(|p| trimmed.contains(**p)) {
            return Some(format!("test `{}` contains skip pattern: {}", name, pattern));
        }
        // A bare return inside a nested block is a conditional early exit
        (trimmed == "return;" && depth > 1)
            .then(|| format!("test `{}` has conditional early return (silent skip)", name))
    });
    fail_with(
        &violations,
        "SILENT TEST SKIPS ARE NOT ALLOWED",
        &[
            "Tests must FAIL if they cannot run, not silently pass.",
            "  - Spin up an in-process test server",
            "  - Use assert!() to verify preconditions",
        ],
        "silent test skip(s) found. Make tests fail instead of skip.",
    );
}

/// A thread that builds its own tokio runtime strands every task and
/// channel created on it once the thread exits.
fn enforce_no_nested_runtimes(root: &Path, rust_files: &[&PathBuf]) {
    let violations = scan_lines(root, rust_files, |lines, i| {
        let trimmed = lines[i].trim();
        if trimmed.starts_with("//")
            || !(trimmed.contains("std::thread::spawn") || trimmed.contains("thread::spawn("))
        {
            return false;
        }
        let end = (i + 20).min(lines.len());
        let context = lines[i..end].join("\n");
        context.contains("Runtime::new()") || context.contains("runtime::Builder")
    });
    fail_with(
        &violations,
        "NESTED TOKIO RUNTIMES ARE NOT ALLOWED",
        &[
            "Use tokio::spawn or tokio::task::spawn_blocking on the main runtime.",
        ],
        "nested runtime(s) found. Use the main runtime instead.",
    );
}

/// Environment variables are process-global; tests touching them must not
/// run in parallel.
fn enforce_serial_for_env_mutations(root: &Path, rust_files: &[&PathBuf]) {
    let violations = scan_test_bodies(root, rust_files, |name, trimmed, _, has_serial| {
        let mutates = !trimmed.starts_with("//")
            && (trimmed.contains("env::set_var") || trimmed.contains("env::remove_var"));
        (mutates && !has_serial).then(|| format!("test `{}` mutates env without #[serial]", name))
    });
    fail_with(
        &violations,
        "ENV MUTATIONS REQUIRE #[serial]",
        &[
            "Add #[serial] from serial_test to tests that call",
            "std::env::set_var or std::env::remove_var.",
        ],
        "test(s) mutate env vars without #[serial].",
    );
}
