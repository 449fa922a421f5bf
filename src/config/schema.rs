//! Configuration types and built-in defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Main review instruction used when `promptTemplate.main` is not set.
///
/// The model is told to answer with the pass phrase from
/// [`crate::review::verdict::PASS_PHRASE`] when no changes are needed.
pub const DEFAULT_MAIN_TEMPLATE: &str = "
## 充当角色

你是一个专业的代码审查助手，你的任务是对暂存区文件的代码进行审查，并给出是否建议提交的结果以及原因，最终只需要告知我最终结果，不要包含任何其他内容
如果建议提交，则返回此次代码修改很棒，不需要调整，可直接提交。如果不建议提交，则直接给出原因。

以下是待审查的代码变更：


";

/// Files that never need a review.
const DEFAULT_IGNORE: &[&str] = &[
    "code-review.yaml",
    "pnpm-lock.yaml",
    "package-lock.json",
    "yarn.lock",
];

/// Validated configuration, after defaults, `.gitignore` and the user's file
/// have been merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,

    #[serde(rename = "LLM", default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,

    /// Shell commands to run after the review, before committing.
    #[serde(rename = "customCommands", default, deserialize_with = "null_as_default")]
    pub custom_commands: Vec<String>,

    /// Whether `.gitignore` patterns join the ignore list.
    #[serde(rename = "isContainGitignore", default = "default_true")]
    pub is_contain_gitignore: bool,

    #[serde(rename = "promptTemplate", default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<PromptTemplate>,

    /// Category key (e.g. `"js,ts,jsx,tsx"`) to review focus points.
    #[serde(rename = "reviewGuidelines", default, skip_serializing_if = "Option::is_none")]
    pub review_guidelines: Option<BTreeMap<String, Vec<String>>>,
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "BASE_URL", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(rename = "API_KEY", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Prompt overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// Category key to an extra prompt fragment appended to that file's section.
    #[serde(rename = "fileTypes", default, skip_serializing_if = "Option::is_none")]
    pub file_types: Option<BTreeMap<String, String>>,

    #[serde(rename = "codeStandards", default, skip_serializing_if = "Option::is_none")]
    pub code_standards: Option<Vec<String>>,
}

/// Endpoint and key, both present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmCredentials {
    pub base_url: String,
    pub api_key: String,
}

fn default_true() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        let mut guidelines = BTreeMap::new();
        guidelines.insert(
            "js,ts,jsx,tsx".to_string(),
            strings(&[
                "检查是否存在潜在的内存泄漏",
                "确保异步函数正确处理错误",
                "检查是否有不必要的渲染或计算",
            ]),
        );
        guidelines.insert(
            "css,scss,less".to_string(),
            strings(&[
                "检查是否有不必要的重复样式",
                "确保样式命名符合项目规范",
                "检查媒体查询是否合理",
            ]),
        );
        guidelines.insert(
            "py".to_string(),
            strings(&[
                "检查是否遵循PEP8规范",
                "确保适当的类型注释",
                "检查异常处理是否完善",
            ]),
        );

        Self {
            ignore: Some(strings(DEFAULT_IGNORE)),
            llm: None,
            custom_commands: Vec::new(),
            is_contain_gitignore: true,
            prompt_template: Some(PromptTemplate {
                main: Some(DEFAULT_MAIN_TEMPLATE.to_string()),
                file_types: None,
                code_standards: Some(Vec::new()),
            }),
            review_guidelines: Some(guidelines),
        }
    }
}

impl Config {
    /// Ignore patterns, empty when none are configured.
    pub fn ignore_patterns(&self) -> &[String] {
        self.ignore.as_deref().unwrap_or_default()
    }

    /// The endpoint credentials, if both are set and non-empty.
    pub fn llm_credentials(&self) -> Option<LlmCredentials> {
        let llm = self.llm.as_ref()?;
        let base_url = llm.base_url.as_deref().filter(|s| !s.is_empty())?;
        let api_key = llm.api_key.as_deref().filter(|s| !s.is_empty())?;
        Some(LlmCredentials {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Configured main template, or the built-in one when unset or empty.
    pub fn main_template(&self) -> &str {
        self.prompt_template
            .as_ref()
            .and_then(|t| t.main.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MAIN_TEMPLATE)
    }

    pub fn code_standards(&self) -> &[String] {
        self.prompt_template
            .as_ref()
            .and_then(|t| t.code_standards.as_deref())
            .unwrap_or_default()
    }

    /// Review focus points for a file category.
    pub fn guidelines_for(&self, category: &str) -> &[String] {
        self.review_guidelines
            .as_ref()
            .and_then(|g| g.get(category))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Extra prompt fragment for a file category.
    pub fn file_type_template(&self, category: &str) -> Option<&str> {
        self.prompt_template
            .as_ref()
            .and_then(|t| t.file_types.as_ref())
            .and_then(|types| types.get(category))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}
