//! Command dispatch: one invocation in, one [`Reply`] out.
//!
//! Agent commands all go through [`CommandRouter::run_agent`]. Utility
//! commands each have a small handler. Nothing here knows about Discord.

use crate::assembler::PromptAssembler;
use crate::commands::template::TemplateVars;
use crate::commands::{
    AGENT_COMMANDS, AgentCommand, Args, Command, Invocation, OptionSpec, Presentation,
    UtilityKind, all_specs, find,
};
use crate::prompts::AgentPromptSet;
use crate::response::{Reply, file_slug, preview};
use brandbot_config::{AppConfig, PresentationConfig};
use brandbot_core::brand::BrandConfig;
use brandbot_core::error::CommandError;
use brandbot_knowledge::{KnowledgeBase, Scraper, document};
use brandbot_providers::ProviderResolver;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const SOURCE_LIST_LIMIT: usize = 10;
const SOURCE_NAME_CHARS: usize = 50;
const UPLOAD_PREVIEW_CHARS: usize = 500;
const DESCRIPTION_PREVIEW_CHARS: usize = 200;

/// Shared, read-mostly state for every interaction.
pub struct BotContext {
    pub brand: BrandConfig,
    /// Name used in role prompts; the brand name when no company is set
    pub company_name: String,
    pub assembler: PromptAssembler,
    pub resolver: ProviderResolver,
    pub knowledge: Arc<KnowledgeBase>,
    pub scraper: Scraper,
    pub presentation: PresentationConfig,
}

impl BotContext {
    pub fn new(
        brand: BrandConfig,
        company_name: impl Into<String>,
        resolver: ProviderResolver,
        knowledge: Arc<KnowledgeBase>,
    ) -> Self {
        let company_name = company_name.into();
        let company_name = if company_name.trim().is_empty() {
            brand.name.clone()
        } else {
            company_name
        };
        let prompts = Arc::new(AgentPromptSet::new(&brand, &company_name));
        let assembler = PromptAssembler::new(prompts).with_knowledge(knowledge.clone());

        Self {
            brand,
            company_name,
            assembler,
            resolver,
            knowledge,
            scraper: Scraper::new(Duration::from_secs(30)),
            presentation: PresentationConfig::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let knowledge = Arc::new(KnowledgeBase::from_config(
            &config.knowledge,
            config.company.clone(),
        ));
        let mut ctx = Self::new(
            config.brand(),
            config.company.name.clone(),
            ProviderResolver::from_config(&config.providers),
            knowledge,
        )
        .with_presentation(config.presentation.clone());
        ctx.scraper = Scraper::new(Duration::from_secs(config.knowledge.fetch_timeout_secs));
        ctx
    }

    pub fn with_presentation(mut self, presentation: PresentationConfig) -> Self {
        self.presentation = presentation;
        self
    }
}

#[derive(Clone)]
pub struct CommandRouter {
    ctx: Arc<BotContext>,
}

impl CommandRouter {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &BotContext {
        &self.ctx
    }

    pub async fn dispatch(&self, invocation: Invocation) -> Result<Reply, CommandError> {
        let command = find(&invocation.command)
            .ok_or_else(|| CommandError::UnknownCommand(invocation.command.clone()))?;
        debug!(command = %invocation.command, "Dispatching command");

        let reply = match command {
            Command::Agent(cmd) => self.run_agent(cmd, &invocation.args).await?,
            Command::Utility(kind) => self.run_utility(kind, &invocation).await?,
        };
        Ok(reply.within_embed_limit(&format!("{}_response.md", file_slug(&invocation.command))))
    }

    async fn run_agent(&self, cmd: &AgentCommand, args: &Args) -> Result<Reply, CommandError> {
        let ctx = &self.ctx;
        let args = args.resolve(cmd.options)?;
        let vars = TemplateVars {
            brand: &ctx.brand,
            company: &ctx.company_name,
            args: &args,
        };

        let request = vars.fill(cmd.template);
        let query = knowledge_query(cmd.options, &args);
        let query = if query.is_empty() { request.as_str() } else { query.as_str() };
        let prompt = ctx.assembler.assemble_with_query(cmd.agent, &request, Some(query)).await;

        let resolution = ctx.resolver.complete(&prompt.system, &prompt.request).await?;
        info!(
            command = cmd.name,
            provider = %resolution.provider,
            model = %resolution.model,
            chars = resolution.text.chars().count(),
            "Command completed"
        );

        let reply = Reply::new(cmd.title, ctx.brand.primary_color).description(vars.fill(cmd.summary));
        let reply = self.present(cmd, &vars, reply, &resolution.text);
        let default_footer = format!("Generated by {} ({})", resolution.provider, resolution.model);

        Ok(match reply.footer {
            Some(_) => reply,
            None => reply.footer(default_footer),
        })
    }

    fn present(&self, cmd: &AgentCommand, vars: &TemplateVars<'_>, reply: Reply, text: &str) -> Reply {
        let limit = self.ctx.presentation.field_limit;

        match cmd.presentation {
            Presentation::Single { label, next_steps } => {
                let reply = reply.field(label, text, limit);
                with_next_steps(reply, next_steps, vars, limit)
            }
            Presentation::Chunked {
                label,
                next_steps,
                echo,
                footer,
            } => {
                let overflow = format!("{}_response.md", cmd.name);
                let mut reply = reply.chunked_fields(
                    &vars.fill(label),
                    text,
                    limit,
                    self.ctx.presentation.max_fields,
                    &overflow,
                );
                if let Some((echo_label, option)) = echo
                    && let Some(value) = vars.args.get(option).filter(|v| !v.trim().is_empty())
                {
                    reply = reply.field(echo_label, value, limit);
                }
                let reply = with_next_steps(reply, next_steps, vars, limit);
                match footer {
                    Some(footer) => reply.footer(vars.fill(footer)),
                    None => reply,
                }
            }
            Presentation::File {
                label,
                preview_chars,
                filename,
                heading,
            } => {
                let filename = vars.fill_with(filename, file_slug);
                let content = format!("{}\n\n{text}", vars.fill(heading));
                reply
                    .field(label, preview(text, preview_chars), limit)
                    .field(
                        "📎 Full Content",
                        format!("The complete content is attached as `{filename}`."),
                        limit,
                    )
                    .attach(filename, content)
            }
        }
    }

    async fn run_utility(&self, kind: UtilityKind, invocation: &Invocation) -> Result<Reply, CommandError> {
        let args = invocation.args.resolve(kind.spec().options)?;
        match kind {
            UtilityKind::ImageGenerate => self.image_generate(&args).await,
            UtilityKind::LearnUrl => self.learn_url(&args).await,
            UtilityKind::UploadDoc => self.upload_doc(invocation).await,
            UtilityKind::AddInfo => self.add_info(&args).await,
            UtilityKind::KnowledgeStatus => Ok(self.knowledge_status().await),
            UtilityKind::Help => Ok(self.help()),
            UtilityKind::Test => Ok(self.test().await),
        }
    }

    async fn image_generate(&self, args: &Args) -> Result<Reply, CommandError> {
        let ctx = &self.ctx;
        let images = ctx.resolver.registry().images().ok_or_else(|| {
            CommandError::Unconfigured(
                "Image generation needs an OpenAI key; set OPENAI_API_KEY".into(),
            )
        })?;

        let subject = args.require("prompt")?;
        let style = args.get("style").unwrap_or("default");
        let prompt = format!(
            "{subject}. Style: {style}. Brand aesthetic for {}: {}. \
             Brand colors: primary #{:06x}, accent #{:06x}.",
            ctx.brand.name, ctx.brand.style_guidelines, ctx.brand.primary_color, ctx.brand.accent_color,
        );

        let url = images.generate_image(&prompt).await?;
        info!(prompt_chars = prompt.len(), "Image generated");

        Ok(Reply::new("🖼️ Branded Image Generated!", ctx.brand.primary_color)
            .description(format!("**Prompt:** {subject}\n**Style:** {style}"))
            .image(url)
            .footer(format!("Generated for {}", ctx.brand.name)))
    }

    async fn learn_url(&self, args: &Args) -> Result<Reply, CommandError> {
        let ctx = &self.ctx;
        let limit = ctx.presentation.field_limit;
        let url = args.require("url")?;

        let page = ctx.scraper.fetch(url).await?;
        let entry = page.to_entry();
        let title = entry.title.clone();
        ctx.knowledge.add_entry(entry, Some(page.url.clone())).await?;
        info!(url = %page.url, title = %title, "Learned from URL");

        let description = page
            .meta_description
            .as_deref()
            .map(|d| preview(d, DESCRIPTION_PREVIEW_CHARS))
            .unwrap_or_else(|| "No description found".into());
        let stats = format!(
            "**Headings:** {}\n**Paragraphs:** {}\n**Links:** {}\n**Characters stored:** {}",
            page.headings.len(),
            page.paragraphs.len(),
            page.links.len(),
            page.text().chars().count(),
        );

        Ok(Reply::new("🌐 Website Content Learned!", ctx.brand.primary_color)
            .description(format!("**Source:** {}", page.url))
            .field("📄 Page Title", &title, limit)
            .field("📝 Description", description, limit)
            .field("📊 Content Stats", stats, limit)
            .footer("This content is now part of the knowledge base"))
    }

    async fn upload_doc(&self, invocation: &Invocation) -> Result<Reply, CommandError> {
        let ctx = &self.ctx;
        let limit = ctx.presentation.field_limit;
        let upload = invocation
            .upload
            .as_ref()
            .ok_or_else(|| CommandError::MissingArgument("document".into()))?;

        let doc = document::extract(&upload.filename, &upload.bytes)?;
        ctx.knowledge
            .add_entry(doc.to_entry(), Some(doc.filename.clone()))
            .await?;
        info!(file = %doc.filename, bytes = doc.size_bytes, "Document learned");

        let stats = format!(
            "**Type:** {}\n**Size:** {:.1} KB\n**Content length:** {} characters",
            doc.kind.label(),
            doc.size_bytes as f64 / 1024.0,
            doc.content.chars().count(),
        );

        Ok(Reply::new("📄 Document Processed!", ctx.brand.primary_color)
            .description(format!("**File:** {}", doc.filename))
            .field("📊 Document Stats", stats, limit)
            .field("👀 Content Preview", preview(&doc.content, UPLOAD_PREVIEW_CHARS), limit)
            .footer("This document is now part of the knowledge base"))
    }

    async fn add_info(&self, args: &Args) -> Result<Reply, CommandError> {
        let ctx = &self.ctx;
        let limit = ctx.presentation.field_limit;
        let title = args.require("title")?.trim();
        let content = args.require("content")?.trim();

        let entry = brandbot_core::KnowledgeEntry::new(
            title,
            content,
            brandbot_core::SourceKind::Manual,
        );
        let replaced = ctx.knowledge.add_entry(entry, None).await?;
        info!(title, replaced, "Manual knowledge added");

        let heading = if replaced {
            "✏️ Information Updated!"
        } else {
            "✅ Information Added!"
        };
        Ok(Reply::new(heading, ctx.brand.primary_color)
            .field("📌 Title", title, limit)
            .field("📝 Content", content, limit))
    }

    async fn knowledge_status(&self) -> Reply {
        let ctx = &self.ctx;
        let limit = ctx.presentation.field_limit;
        let summary = ctx.knowledge.summary().await;

        let stats = format!(
            "**URLs:** {}\n**Documents:** {}\n**Manual entries:** {}\n**Total entries:** {}",
            summary.urls, summary.documents, summary.manual, summary.total,
        );
        let updated = summary
            .last_updated
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "Never".into());

        let sources = ctx.knowledge.sources(SOURCE_LIST_LIMIT).await;
        let listing = if sources.is_empty() {
            "No sources yet. Use /learn_url, /upload_doc or /add_info.".to_string()
        } else {
            sources
                .iter()
                .map(|s| {
                    let name = s.location.as_deref().unwrap_or(&s.title);
                    format!("• [{}] {}", s.kind, preview(name, SOURCE_NAME_CHARS))
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        Reply::new("🧠 Knowledge Base Status", ctx.brand.primary_color)
            .field("📊 Statistics", stats, limit)
            .field("🕒 Last Updated", updated, limit)
            .field("📚 Sources", listing, limit)
    }

    fn help(&self) -> Reply {
        let ctx = &self.ctx;
        let limit = ctx.presentation.field_limit;
        let lines: Vec<String> = all_specs()
            .iter()
            .map(|spec| format!("**/{}**: {}\n`{}`", spec.name, spec.description, spec.example))
            .collect();

        let mut reply = Reply::new(format!("🤖 {} Assistant Commands", ctx.brand.name), ctx.brand.primary_color)
            .description(format!(
                "{} agent commands backed by AI, plus knowledge and utility commands.",
                AGENT_COMMANDS.len()
            ));
        for (i, block) in pack_lines(&lines, limit).into_iter().enumerate() {
            let name = if i == 0 {
                "📋 Commands".to_string()
            } else {
                format!("📋 Commands (Continued {})", i + 1)
            };
            reply = reply.field(name, block, limit);
        }
        reply.footer("Options marked required must be filled in")
    }

    async fn test(&self) -> Reply {
        let ctx = &self.ctx;
        let limit = ctx.presentation.field_limit;
        let order = ctx.resolver.order();
        let providers = if order.is_empty() {
            "None configured".to_string()
        } else {
            order
                .iter()
                .enumerate()
                .map(|(i, kind)| format!("{}. {kind}", i + 1))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let images = if ctx.resolver.registry().images().is_some() {
            "Available"
        } else {
            "Unavailable (no OpenAI key)"
        };

        Reply::new("✅ Bot is Working!", ctx.brand.primary_color)
            .description(format!("{} brand assistant is online.", ctx.brand.name))
            .field(
                "🎨 Brand",
                format!(
                    "**Name:** {}\n**Primary:** #{:06x}\n**Accent:** #{:06x}",
                    ctx.brand.name, ctx.brand.primary_color, ctx.brand.accent_color
                ),
                limit,
            )
            .field("🤖 AI Providers (in order)", providers, limit)
            .field("🖼️ Image Generation", images, limit)
            .field(
                "🧠 Knowledge Base",
                format!("{} entries", ctx.knowledge.len().await),
                limit,
            )
    }
}

/// Every option value, defaults included, in declaration order.
fn knowledge_query(options: &[OptionSpec], args: &Args) -> String {
    options
        .iter()
        .filter_map(|o| args.get(o.name))
        .filter(|v| !v.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn with_next_steps(reply: Reply, next_steps: Option<&str>, vars: &TemplateVars<'_>, limit: usize) -> Reply {
    match next_steps {
        Some(hint) => reply.field("💡 Next Steps", vars.fill(hint), limit),
        None => reply,
    }
}

/// Group lines into blocks of at most `limit` characters.
fn pack_lines(lines: &[String], limit: usize) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();
    let mut current = String::new();
    for line in lines {
        let needed = current.chars().count() + line.chars().count() + 2;
        if !current.is_empty() && needed > limit {
            blocks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brandbot_core::error::{ErrorKind, ProviderError};
    use brandbot_core::knowledge::CompanyInfo;
    use brandbot_core::message::Message;
    use brandbot_core::provider::{
        ImageGenerator, Provider, ProviderKind, ProviderRequest, ProviderResponse,
    };
    use crate::response::EMBED_TOTAL_LIMIT;
    use brandbot_providers::ProviderRegistry;
    use std::sync::Mutex;

    struct Canned {
        text: String,
        last_request: Mutex<Option<ProviderRequest>>,
    }

    impl Canned {
        fn new(text: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                text: text.into(),
                last_request: Mutex::new(None),
            })
        }

        fn last_user_message(&self) -> String {
            let guard = self.last_request.lock().unwrap();
            let request = guard.as_ref().unwrap();
            request.messages.last().unwrap().content.clone()
        }

        fn last_system(&self) -> String {
            let guard = self.last_request.lock().unwrap();
            guard.as_ref().unwrap().messages[0].content.clone()
        }
    }

    #[async_trait]
    impl Provider for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            *self.last_request.lock().unwrap() = Some(request);
            Ok(ProviderResponse {
                message: Message::assistant(self.text.clone()),
                usage: None,
                model: "canned-1".into(),
            })
        }
    }

    struct FixedImage;

    #[async_trait]
    impl ImageGenerator for FixedImage {
        async fn generate_image(&self, prompt: &str) -> Result<String, ProviderError> {
            assert!(prompt.contains("Brand colors"));
            Ok("https://images.example/1.png".into())
        }
    }

    fn router_with(registry: ProviderRegistry) -> CommandRouter {
        let knowledge = Arc::new(KnowledgeBase::in_memory(CompanyInfo::default()));
        let ctx = BotContext::new(
            BrandConfig::default(),
            "Acme",
            ProviderResolver::new(registry),
            knowledge,
        );
        CommandRouter::new(Arc::new(ctx))
    }

    fn router(text: &str) -> (CommandRouter, Arc<Canned>) {
        let canned = Canned::new(text);
        let registry = ProviderRegistry::new().with(ProviderKind::OpenAi, canned.clone());
        (router_with(registry), canned)
    }

    #[tokio::test]
    async fn brand_command_fills_template_and_footer() {
        let (router, canned) = router("Use bold colors.");
        let reply = router
            .dispatch(Invocation::new("brand", Args::new().with("query", "campaign colors")))
            .await
            .unwrap();

        assert_eq!(reply.title, "🏢 Brand Strategic Guidance");
        assert_eq!(reply.fields[0].name, "📋 Brand Guidance");
        assert_eq!(reply.fields[0].value, "Use bold colors.");
        assert_eq!(reply.footer.as_deref(), Some("Brand Assistant for SV Brand"));
        assert_eq!(reply.color, BrandConfig::default().primary_color);

        let sent = canned.last_user_message();
        assert!(sent.contains("Query: campaign colors"));
        assert!(!sent.contains("{query}"));
    }

    #[tokio::test]
    async fn missing_required_option() {
        let (router, _) = router("x");
        let err = router
            .dispatch(Invocation::new("brand", Args::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument(ref n) if n == "query"));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn unknown_command() {
        let (router, _) = router("x");
        let err = router
            .dispatch(Invocation::new("dance", Args::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(_)));
    }

    #[tokio::test]
    async fn file_presentation_attaches_content() {
        let (router, _) = router(&"Body text. ".repeat(200));
        let reply = router
            .dispatch(Invocation::new("blog", Args::new().with("topic", "AI in business")))
            .await
            .unwrap();

        let file = reply.attachment.unwrap();
        assert_eq!(file.filename, "blog_AI_in_business.md");
        assert!(file.content.starts_with("# Blog Post: AI in business\n\n"));
        assert!(reply.fields[0].value.ends_with("..."));
        assert_eq!(reply.fields[0].value.chars().count(), 803);
    }

    #[tokio::test]
    async fn image_concept_is_truncated_with_next_steps() {
        let (router, _) = router(&"c".repeat(3000));
        let reply = router
            .dispatch(Invocation::new("image", Args::new().with("prompt", "logo")))
            .await
            .unwrap();

        assert_eq!(reply.fields.len(), 2);
        assert_eq!(reply.fields[0].value.chars().count(), 1024);
        assert!(reply.fields[0].value.ends_with("..."));
        assert_eq!(reply.fields[1].name, "💡 Next Steps");
        assert!(reply.attachment.is_none());
    }

    #[tokio::test]
    async fn social_echoes_hashtags_only_when_given() {
        let (router, _) = router("Post body");
        let with = router
            .dispatch(Invocation::new(
                "social",
                Args::new()
                    .with("platform", "LinkedIn")
                    .with("topic", "remote teams")
                    .with("hashtags", "#remote"),
            ))
            .await
            .unwrap();
        assert_eq!(with.fields[0].name, "📝 LinkedIn Post");
        assert!(with.fields.iter().any(|f| f.name == "🏷️ Requested Hashtags" && f.value == "#remote"));

        let without = router
            .dispatch(Invocation::new(
                "social",
                Args::new().with("platform", "X").with("topic", "remote teams"),
            ))
            .await
            .unwrap();
        assert!(!without.fields.iter().any(|f| f.name == "🏷️ Requested Hashtags"));
    }

    #[tokio::test]
    async fn ask_uses_knowledge() {
        let (router, canned) = router("Plans start at $10.");
        router
            .dispatch(Invocation::new(
                "add_info",
                Args::new().with("title", "Pricing").with("content", "Plans start at $10"),
            ))
            .await
            .unwrap();

        router
            .dispatch(Invocation::new("ask", Args::new().with("question", "What is our pricing?")))
            .await
            .unwrap();
        assert!(canned.last_system().contains("Relevant Knowledge Base Information"));
        assert!(canned.last_system().contains("Plans start at $10"));
    }

    #[tokio::test]
    async fn calendar_searches_optional_values() {
        let (router, canned) = router("Week 1: teaser posts");
        router
            .dispatch(Invocation::new(
                "add_info",
                Args::new()
                    .with("title", "Spring product launch")
                    .with("content", "Launch date is May 1"),
            ))
            .await
            .unwrap();

        router
            .dispatch(Invocation::new(
                "calendar",
                Args::new().with("focus", "Spring product launch"),
            ))
            .await
            .unwrap();
        assert!(canned.last_system().contains("Relevant Knowledge Base Information"));
        assert!(canned.last_system().contains("Launch date is May 1"));
    }

    #[test]
    fn knowledge_query_includes_defaults() {
        let cmd = AGENT_COMMANDS.iter().find(|c| c.name == "calendar").unwrap();
        let args = Args::new().with("focus", "launch").resolve(cmd.options).unwrap();
        assert_eq!(knowledge_query(cmd.options, &args), "1 month launch");
    }

    #[tokio::test]
    async fn echoed_input_stays_within_embed_limit() {
        let answer = "r".repeat(3000);
        let (router, _) = router(&answer);
        let reply = router
            .dispatch(Invocation::new(
                "brand_guardian",
                Args::new().with("content", "p".repeat(3000)),
            ))
            .await
            .unwrap();

        assert!(reply.embed_chars() <= EMBED_TOTAL_LIMIT, "{}", reply.embed_chars());
        let shown: String = reply
            .fields
            .iter()
            .filter(|f| f.name.starts_with("🛡️") || f.name.contains("Continued"))
            .map(|f| f.value.as_str())
            .collect();
        assert!(shown.contains(&answer[..1000]));
    }

    #[tokio::test]
    async fn long_file_summary_stays_within_embed_limit() {
        let (router, _) = router(&"Body. ".repeat(1000));
        let reply = router
            .dispatch(Invocation::new(
                "document",
                Args::new()
                    .with("document_type", "p".repeat(3000))
                    .with("topic", "t".repeat(3000))
                    .with("length", "l".repeat(3000)),
            ))
            .await
            .unwrap();

        assert!(reply.embed_chars() <= EMBED_TOTAL_LIMIT, "{}", reply.embed_chars());
        assert!(reply.attachment.unwrap().filename.ends_with(".txt"));
    }

    #[tokio::test]
    async fn chunked_overflow_with_more_fields_stays_within_embed_limit() {
        let canned = Canned::new("z".repeat(20_000));
        let registry = ProviderRegistry::new().with(ProviderKind::OpenAi, canned);
        let knowledge = Arc::new(KnowledgeBase::in_memory(CompanyInfo::default()));
        let ctx = BotContext::new(
            BrandConfig::default(),
            "Acme",
            ProviderResolver::new(registry),
            knowledge,
        )
        .with_presentation(PresentationConfig {
            max_fields: 8,
            ..PresentationConfig::default()
        });
        let router = CommandRouter::new(Arc::new(ctx));

        let reply = router
            .dispatch(Invocation::new(
                "social",
                Args::new()
                    .with("platform", "LinkedIn")
                    .with("topic", "t".repeat(3000))
                    .with("hashtags", "#h".repeat(600)),
            ))
            .await
            .unwrap();

        assert!(reply.embed_chars() <= EMBED_TOTAL_LIMIT, "{}", reply.embed_chars());
        assert_eq!(reply.attachment.unwrap().content.chars().count(), 20_000);
        assert_eq!(reply.fields.last().unwrap().name, "📎 Full Response");
    }

    #[tokio::test]
    async fn add_info_reports_replacement() {
        let (router, _) = router("x");
        let add = |content: &str| {
            Invocation::new(
                "add_info",
                Args::new().with("title", "Hours").with("content", content),
            )
        };
        let first = router.dispatch(add("9-5")).await.unwrap();
        let second = router.dispatch(add("8-6")).await.unwrap();

        assert_eq!(first.title, "✅ Information Added!");
        assert_eq!(second.title, "✏️ Information Updated!");
        assert_eq!(router.context().knowledge.len().await, 1);
    }

    #[tokio::test]
    async fn upload_doc_rejects_unsupported_types() {
        let (router, _) = router("x");
        let err = router
            .dispatch(Invocation::new("upload_doc", Args::new()).with_upload("legacy.doc", b"\xD0\xCF\x11\xE0".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        let err = router
            .dispatch(Invocation::new("upload_doc", Args::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument(ref n) if n == "document"));
    }

    #[tokio::test]
    async fn upload_doc_stores_text() {
        let (router, _) = router("x");
        let reply = router
            .dispatch(
                Invocation::new("upload_doc", Args::new())
                    .with_upload("notes.md", b"# Notes\nWe ship weekly.".to_vec()),
            )
            .await
            .unwrap();
        assert_eq!(reply.title, "📄 Document Processed!");
        assert!(reply.fields[0].value.contains("MD"));
        assert!(router.context().knowledge.get("notes.md").await.is_some());
    }

    #[tokio::test]
    async fn knowledge_status_lists_sources() {
        let (router, _) = router("x");
        let empty = router
            .dispatch(Invocation::new("knowledge_status", Args::new()))
            .await
            .unwrap();
        assert!(empty.fields[1].value.contains("Never"));

        router
            .dispatch(Invocation::new(
                "add_info",
                Args::new().with("title", "Mission").with("content", "Help teams grow"),
            ))
            .await
            .unwrap();
        let reply = router
            .dispatch(Invocation::new("knowledge_status", Args::new()))
            .await
            .unwrap();
        assert!(reply.fields[0].value.contains("**Manual entries:** 1"));
        assert!(reply.fields[2].value.contains("[manual] Mission"));
    }

    #[tokio::test]
    async fn help_lists_every_command_within_limits() {
        let (router, _) = router("x");
        let reply = router
            .dispatch(Invocation::new("help", Args::new()))
            .await
            .unwrap();

        let all: String = reply.fields.iter().map(|f| f.value.as_str()).collect();
        for spec in all_specs() {
            assert!(all.contains(&format!("**/{}**", spec.name)), "{}", spec.name);
        }
        assert!(reply.fields.len() <= 25);
        assert!(reply.fields.iter().all(|f| f.value.chars().count() <= 1024));
    }

    #[tokio::test]
    async fn test_command_reports_provider_order() {
        let (router, _) = router("x");
        let reply = router
            .dispatch(Invocation::new("test", Args::new()))
            .await
            .unwrap();
        assert!(reply.fields[1].value.contains("1. openai"));

        let bare = router_with(ProviderRegistry::new());
        let reply = bare.dispatch(Invocation::new("test", Args::new())).await.unwrap();
        assert_eq!(reply.fields[1].value, "None configured");
    }

    #[tokio::test]
    async fn image_generate_needs_openai() {
        let bare = router_with(ProviderRegistry::new());
        let err = bare
            .dispatch(Invocation::new("image_generate", Args::new().with("prompt", "team")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unconfigured);

        let with_images = router_with(ProviderRegistry::new().with_images(Arc::new(FixedImage)));
        let reply = with_images
            .dispatch(Invocation::new("image_generate", Args::new().with("prompt", "team")))
            .await
            .unwrap();
        assert_eq!(reply.image_url.as_deref(), Some("https://images.example/1.png"));
    }

    #[tokio::test]
    async fn empty_registry_is_unconfigured() {
        let bare = router_with(ProviderRegistry::new());
        let err = bare
            .dispatch(Invocation::new("brand", Args::new().with("query", "test")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unconfigured);
    }

    #[test]
    fn pack_lines_respects_limit() {
        let lines: Vec<String> = (0..30).map(|i| format!("line {i} {}", "x".repeat(90))).collect();
        let blocks = pack_lines(&lines, 1024);
        assert!(blocks.len() > 1);
        assert!(blocks.iter().all(|b| b.chars().count() <= 1024));
        assert_eq!(blocks.join("\n\n").matches("line ").count(), 30);
    }
}
