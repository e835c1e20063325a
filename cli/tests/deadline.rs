//! # SupportBot CLI Deadline Integration Tests
//!
//! File: cli/tests/deadline.rs
//!
mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_deadline_for_full_korean_date() {
    supportbot_cmd()
        .args(["deadline", "2025년 11월 20일 거래분"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Date:     2025년 11월 20일 (2025-11-20)\nDeadline: 2026년 1월 25일",
        ));
}

#[test]
fn test_deadline_for_iso_date_in_first_half() {
    supportbot_cmd()
        .args(["d", "거래일", "2024/06/30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deadline: 2024년 7월 25일"));
}

#[test]
fn test_deadline_without_date_fails() {
    supportbot_cmd()
        .args(["deadline", "언제까지", "신고하나요"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No date found"));
}
