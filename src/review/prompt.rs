//! Review prompt construction.

use std::fmt::Write;

use crate::config::Config;
use crate::git::{DiffContent, StagedFile};

/// Extension groups sharing review guidelines, checked in order.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("js,ts,jsx,tsx", &["js", "ts", "jsx", "tsx", "mjs", "cjs"]),
    ("css,scss,less", &["css", "scss", "less", "styl"]),
    ("py", &["py", "pyw"]),
    ("java", &["java"]),
    ("php", &["php"]),
    ("ruby", &["rb"]),
    ("go", &["go"]),
    ("rust", &["rs"]),
    ("csharp", &["cs"]),
    ("swift", &["swift"]),
    ("html", &["html", "htm"]),
    ("markdown", &["md", "markdown"]),
    ("json", &["json"]),
    ("yaml", &["yml", "yaml"]),
    ("xml", &["xml"]),
    ("shell", &["sh", "bash", "zsh"]),
];

/// Category of files without a known extension.
pub const OTHER_CATEGORY: &str = "other";

/// A staged file together with its changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReview {
    pub file: StagedFile,
    pub diff: DiffContent,
}

/// Map a lower-case extension to its category key.
pub fn file_type_category(extension: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|(_, extensions)| extensions.contains(&extension))
        .map(|(category, _)| *category)
        .unwrap_or(OTHER_CATEGORY)
}

/// Build the review prompt. Identical inputs give byte-identical output.
pub fn build_prompt(files: &[FileReview], config: &Config) -> String {
    let mut prompt = String::from(config.main_template());

    let standards = config.code_standards();
    if !standards.is_empty() {
        prompt.push_str("## 代码规范指导\n\n请参考以下代码规范进行审查：\n");
        push_numbered(&mut prompt, standards);
        prompt.push('\n');
    }

    for review in files {
        push_file_section(&mut prompt, review, config);
    }

    prompt
}

fn push_file_section(prompt: &mut String, review: &FileReview, config: &Config) {
    let FileReview { file, diff } = review;
    let extension = file.extension();
    let category = file_type_category(&extension);

    let _ = write!(
        prompt,
        "## 文件：{}\n变更类型：{}\n文件类型：{} ({})\n",
        file.path, file.status, extension, category
    );

    let guidelines = config.guidelines_for(category);
    if !guidelines.is_empty() {
        prompt.push_str("\n### 该文件类型的审查重点：\n");
        push_numbered(prompt, guidelines);
        prompt.push('\n');
    }

    if let Some(fragment) = config.file_type_template(category) {
        prompt.push_str(fragment);
        prompt.push('\n');
    }

    prompt.push_str("\n### 代码变更：\n");

    if !diff.added.is_empty() {
        push_code_block(prompt, "新增的行", &extension, &diff.added.join("\n"));
    }
    if !diff.removed.is_empty() {
        push_code_block(prompt, "删除的行", &extension, &diff.removed.join("\n"));
    }
    push_code_block(prompt, "完整的新内容", &extension, &diff.content);
    prompt.push('\n');
}

fn push_numbered(prompt: &mut String, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", i + 1, item);
    }
}

fn push_code_block(prompt: &mut String, title: &str, extension: &str, body: &str) {
    let _ = write!(prompt, "\n#### {title}：\n```{extension}\n{body}\n```\n");
}
