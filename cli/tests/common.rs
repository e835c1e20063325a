//! # SupportBot Integration Test Helpers
//!
//! File: cli/tests/common.rs
//!
//! Shared helpers for the integration tests: a `Command` for the compiled
//! binary and a temporary workspace with a config file and small data files.
//!
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn supportbot_cmd() -> Command {
    let mut cmd = Command::cargo_bin("supportbot").expect("Failed to find supportbot binary for testing");
    cmd.env_remove("SUPPORTBOT_CONFIG").env_remove("RUST_LOG");
    cmd
}

pub const KNOWLEDGE_BASE: &str = r#"{
  "knowledge_base": {
    "vat_deadline": {
      "keywords": { "primary": ["부가세", "부가가치세"], "secondary": ["신고 기한"] },
      "responses": {
        "formal": {
          "greeting": "안녕하세요.",
          "content": "{date} 거래분의 부가세 신고 기한은 {deadline}입니다."
        },
        "casual": { "content": "{date} 거래분은 {deadline}까지 신고하면 돼." }
      },
      "related_guides": [
        { "title": "부가세 신고 가이드", "url": "https://help.example.com/vat" }
      ],
      "follow_up_questions": ["예정신고도 해야 하나요?"]
    }
  }
}"#;

pub const DATASET: &str = r#"{
  "nlu": { "synonyms": { "세금계산서": ["계산서", "전자세금계산서"] } },
  "qa_pairs": [
    {
      "id": "qa-cancel",
      "keywords": ["세금계산서 취소"],
      "answer_polite": "발행된 세금계산서는 수정발행으로 취소하실 수 있습니다.",
      "answer_casual": "수정발행으로 취소하면 돼."
    }
  ]
}"#;

pub const FAQ: &str = r#"{
  "categories": ["세금계산서", "포인트"],
  "items": [
    {
      "id": "faq-001",
      "question": "세금계산서를 취소하려면 어떻게 하나요?",
      "category": "세금계산서",
      "content": [
        { "type": "text", "text": "수정세금계산서를 발행해 주세요." },
        { "type": "list", "items": ["계약 해제", "공급가액 변동"] },
        { "type": "note", "text": "전송 후에는 삭제할 수 없습니다." }
      ]
    },
    {
      "id": "faq-002",
      "question": "포인트는 어떻게 충전하나요?",
      "category": "포인트",
      "answer": "충전 메뉴에서 카드 또는 계좌이체로 충전할 수 있습니다."
    },
    {
      "id": "faq-003",
      "question": "계산서 발행 한도가 있나요?",
      "category": "세금계산서",
      "answer": "발행 한도는 없습니다."
    }
  ]
}"#;

pub const VALID_KNOWLEDGE: &str = r#"{
  "metadata": { "version": "1.0" },
  "synonyms": { "세금계산서": ["계산서"] },
  "items": [
    {
      "id": "k-001",
      "type": "intent",
      "category": "세금계산서",
      "title": "세금계산서 취소",
      "keywords": ["세금계산서", "취소"],
      "priority": 5,
      "responses": {
        "formal": "발행된 세금계산서는 수정발행으로 취소하실 수 있습니다.",
        "casual": "수정발행으로 취소하면 돼. 메뉴에서 바로 할 수 있어."
      }
    }
  ]
}"#;

pub const INVALID_KNOWLEDGE: &str = r#"{
  "metadata": {},
  "items": [
    {
      "id": "k-001",
      "type": "faq",
      "category": "세금계산서",
      "title": "세금계산서 취소",
      "keywords": ["세금계산서"],
      "priority": 11,
      "responses": { "formal": "취소하세요." }
    }
  ]
}"#;

/// A temporary directory with `supportbot.toml` and the data files above.
pub struct Fixture {
    pub dir: TempDir,
    pub config: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config_extra("")
    }

    /// Like `new`, with extra TOML appended to the config file.
    pub fn with_config_extra(extra: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let data = dir.path().join("data");
        fs::create_dir(&data).expect("Failed to create data dir");
        fs::write(data.join("knowledge-base.json"), KNOWLEDGE_BASE).unwrap();
        fs::write(data.join("chatbot-dataset.json"), DATASET).unwrap();
        fs::write(data.join("faq.json"), FAQ).unwrap();
        fs::write(data.join("knowledge.json"), VALID_KNOWLEDGE).unwrap();
        fs::write(data.join("broken-knowledge.json"), INVALID_KNOWLEDGE).unwrap();

        let config = dir.path().join("supportbot.toml");
        let content = format!(
            r#"[data]
knowledge_base = "data/knowledge-base.json"
dataset = "data/chatbot-dataset.json"
faq = "data/faq.json"

[faq]
page_size = 2

[votes]
ip_lookup_url = "http://127.0.0.1:9/"
timeout_secs = 2
{}"#,
            extra
        );
        fs::write(&config, content).expect("Failed to write config");

        Self { dir, config }
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.dir.path().join("data").join(name)
    }

    /// `supportbot --config <fixture config>`, run from the fixture directory.
    pub fn cmd(&self) -> Command {
        let mut cmd = supportbot_cmd();
        cmd.current_dir(self.dir.path()).arg("--config").arg(&self.config);
        cmd
    }
}
