#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn dearly_cmd(root: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("dearly"));
    cmd.env("DEARLY_ROOT", root.path().as_os_str())
        .env_remove("DEARLY_LOG");
    cmd
}

fn card_count(root: &TempDir) -> usize {
    let output = dearly_cmd(root).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let cards: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    cards.len()
}

#[test]
fn test_generate_list_delete_workflow() {
    let root = TempDir::new().unwrap();

    // 1. Empty collection
    dearly_cmd(&root)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No cards yet"));

    // 2. Sample cards
    dearly_cmd(&root)
        .args(["generate", "--count", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 5 sample cards"));

    // 3. Listing shows the first sender
    dearly_cmd(&root)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mom"));

    // 4. Search narrows to one sender
    dearly_cmd(&root)
        .args(["list", "--search", "grandma"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Grandma"))
        .stdout(predicate::str::contains("Dad").not());

    // 5. Delete two cards by index and range
    dearly_cmd(&root)
        .args(["delete", "1", "3-3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 cards"));

    assert_eq!(card_count(&root), 3);
    let image_dirs = fs::read_dir(root.path().join("CardImages")).unwrap().count();
    assert_eq!(image_dirs, 3);
}

#[test]
fn test_scan_favorite_and_show() {
    let root = TempDir::new().unwrap();
    let front = root.path().join("front.png");
    let back = root.path().join("back.png");
    for path in [&front, &back] {
        image::RgbImage::from_pixel(20, 30, image::Rgb([200, 10, 10]))
            .save(path)
            .unwrap();
    }

    dearly_cmd(&root)
        .args(["scan", "--type", "flat"])
        .arg(&front)
        .arg(&back)
        .args(["--sender", "Aunt Sarah", "--occasion", "Thank You"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved card"));

    dearly_cmd(&root)
        .args(["favorite", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Favorited 1 card"));

    dearly_cmd(&root)
        .args(["list", "--sort", "favorites"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Aunt Sarah"));

    dearly_cmd(&root)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20x30"))
        .stdout(predicate::str::contains("[Inside Left placeholder]"));

    dearly_cmd(&root)
        .arg("occasions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Thank You"));
}

#[test]
fn test_short_scan_names_the_next_face() {
    let root = TempDir::new().unwrap();
    let front = root.path().join("front.png");
    image::RgbImage::from_pixel(20, 30, image::Rgb([10, 10, 200]))
        .save(&front)
        .unwrap();

    dearly_cmd(&root)
        .args(["scan", "--type", "flat"])
        .arg(&front)
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs 2 images, got 1"))
        .stderr(predicate::str::contains(
            "Flip the card over and scan the back",
        ));

    assert_eq!(card_count(&root), 0);
}

#[test]
fn test_errors_exit_nonzero() {
    let root = TempDir::new().unwrap();

    dearly_cmd(&root)
        .args(["show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error: Api Error: Index 1 not found",
        ));

    dearly_cmd(&root)
        .arg("reset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    dearly_cmd(&root).args(["reset", "--yes"]).assert().success();
}
