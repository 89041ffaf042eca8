use crate::core::models::{Comment, QuestionReport};
use crate::error::{Error, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::responses::{
        CreateResponseArgs, EasyInputMessageArgs, InputItem, InputParam, OutputItem,
        OutputMessageContent, Role,
    },
};
use async_trait::async_trait;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes YouTube comments to \
extract, categorize and improve the questions viewers ask about the video.";

/// A generative text capability: one system instruction, one user prompt, bounded output.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str, max_output_tokens: u32) -> Result<String>;
}

/// Completion backed by the OpenAI Responses API.
#[derive(Clone)]
pub struct OpenAiCompletion {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompletion {
    pub fn new(api_key: &str, api_base: Option<&str>, model: &str) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletion {
    async fn complete(&self, system: &str, prompt: &str, max_output_tokens: u32) -> Result<String> {
        let request = CreateResponseArgs::default()
            .max_output_tokens(max_output_tokens)
            .model(self.model.as_str())
            .input(InputParam::Items(vec![
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::System)
                        .content(system)
                        .build()?,
                ),
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::User)
                        .content(prompt)
                        .build()?,
                ),
            ]))
            .build()?;

        let response = self.client.responses().create(request).await?;

        let mut content = String::new();
        for output in response.output {
            if let OutputItem::Message(out) = output {
                for c in out.content {
                    match c {
                        OutputMessageContent::OutputText(text) => content.push_str(&text.text),
                        other => {
                            tracing::debug!(content = ?other, "ignoring non-text completion output");
                        }
                    }
                }
            }
        }

        if content.trim().is_empty() {
            return Err(Error::EmptyCompletion);
        }
        Ok(content)
    }
}

/// Turns a comment collection into a question report through a [`CompletionService`].
pub struct QuestionExtractor<C> {
    completion: C,
    max_output_tokens: u32,
}

impl<C: CompletionService> QuestionExtractor<C> {
    pub fn new(completion: C, max_output_tokens: u32) -> Self {
        Self {
            completion,
            max_output_tokens,
        }
    }

    /// Ask the completion service for the direct and indirect questions in `comments`.
    ///
    /// Comments are sent in the order given. The reply is returned as-is.
    pub async fn extract_questions(&self, comments: &[Comment]) -> Result<QuestionReport> {
        let prompt = build_prompt(&format_transcript(comments));
        tracing::debug!(
            comments = comments.len(),
            prompt_bytes = prompt.len(),
            "requesting question extraction"
        );
        let text = self
            .completion
            .complete(SYSTEM_PROMPT, &prompt, self.max_output_tokens)
            .await?;
        Ok(QuestionReport(text))
    }
}

/// One `author: text` line per comment, in collection order.
pub fn format_transcript(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| format!("{}: {}", c.author, c.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_prompt(transcript: &str) -> String {
    format!(
        "Analyze the following YouTube comments and extract every direct and indirect question \
about the video. Categorize each one as either Direct or Indirect. Rephrase indirect questions \
as clear questions, and attribute every question to the commenter who asked it.

Comments:
{transcript}

Format your response as follows:
{direct}:
1. [Commenter name] (optional timestamp): [Question]
2. [Commenter name] (optional timestamp): [Question]
...

{indirect}:
1. [Commenter name] (optional timestamp): [Question]
2. [Commenter name] (optional timestamp): [Question]
...

If there are no questions in a category, write '{none}' under that category.
",
        direct = QuestionReport::DIRECT_HEADING,
        indirect = QuestionReport::INDIRECT_HEADING,
        none = QuestionReport::NONE_FOUND,
    )
}
