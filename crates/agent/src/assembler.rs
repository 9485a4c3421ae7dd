//! Prompt assembly: brand context, role, knowledge, then the request.
//!
//! Assembly has no side effects and no length cap. Long output is handled
//! when the reply is laid out, not here.

use crate::prompts::{AgentKind, AgentPromptSet};
use brandbot_core::error::CommandError;
use brandbot_knowledge::KnowledgeBase;
use std::sync::Arc;
use tracing::debug;

/// A prompt ready for the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub agent: AgentKind,
    /// Brand context + role instructions + knowledge block
    pub system: String,
    /// The user request, verbatim
    pub request: String,
}

impl AssembledPrompt {
    /// Single-string form for backends without a separate system field.
    pub fn render(&self) -> String {
        format!("{}\n\nUser Request: {}", self.system, self.request)
    }
}

pub struct PromptAssembler {
    prompts: Arc<AgentPromptSet>,
    knowledge: Option<Arc<KnowledgeBase>>,
}

impl PromptAssembler {
    pub fn new(prompts: Arc<AgentPromptSet>) -> Self {
        Self {
            prompts,
            knowledge: None,
        }
    }

    pub fn with_knowledge(mut self, knowledge: Arc<KnowledgeBase>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    pub fn prompts(&self) -> &AgentPromptSet {
        &self.prompts
    }

    pub async fn assemble(
        &self,
        agent: AgentKind,
        request: &str,
        use_knowledge: bool,
    ) -> AssembledPrompt {
        let query = use_knowledge.then_some(request);
        self.assemble_with_query(agent, request, query).await
    }

    /// Like [`assemble`](Self::assemble), but searches the knowledge base
    /// with `query` instead of the full request text.
    pub async fn assemble_with_query(
        &self,
        agent: AgentKind,
        request: &str,
        query: Option<&str>,
    ) -> AssembledPrompt {
        let mut system = self.prompts.get(agent).to_string();

        if let Some(query) = query
            && let Some(kb) = &self.knowledge
            && let Some(block) = kb.context_for(query).await
        {
            debug!(agent = %agent, "Knowledge context attached");
            system.push('\n');
            system.push_str(&block);
        }

        AssembledPrompt {
            agent,
            system,
            request: request.to_string(),
        }
    }

    /// Assemble by agent key; unknown keys fail with `UnknownAgent`.
    pub async fn assemble_key(
        &self,
        key: &str,
        request: &str,
        use_knowledge: bool,
    ) -> Result<AssembledPrompt, CommandError> {
        let agent: AgentKind = key.parse()?;
        Ok(self.assemble(agent, request, use_knowledge).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandbot_core::brand::BrandConfig;
    use brandbot_core::knowledge::{CompanyInfo, KnowledgeEntry, SourceKind};

    fn prompts() -> Arc<AgentPromptSet> {
        Arc::new(AgentPromptSet::new(&BrandConfig::default(), "Acme"))
    }

    #[tokio::test]
    async fn every_agent_includes_the_request() {
        let assembler = PromptAssembler::new(prompts());
        for kind in AgentKind::ALL {
            let prompt = assembler.assemble(kind, "launch a podcast", true).await;
            let rendered = prompt.render();
            assert!(!prompt.system.is_empty());
            assert!(rendered.contains("launch a podcast"));
            assert!(rendered.ends_with("User Request: launch a podcast"));
        }
    }

    #[tokio::test]
    async fn knowledge_block_is_merged_when_enabled() {
        let kb = Arc::new(KnowledgeBase::in_memory(CompanyInfo::default()));
        kb.add_entry(
            KnowledgeEntry::new("Pricing", "Plans start at $10", SourceKind::Manual),
            None,
        )
        .await
        .unwrap();

        let assembler = PromptAssembler::new(prompts()).with_knowledge(kb);

        let with = assembler.assemble(AgentKind::Knowledge, "pricing", true).await;
        assert!(with.system.contains("Relevant Knowledge Base Information"));
        assert!(with.system.contains("Plans start at $10"));

        let without = assembler.assemble(AgentKind::Knowledge, "pricing", false).await;
        assert!(!without.system.contains("Relevant Knowledge Base Information"));
    }

    #[tokio::test]
    async fn render_orders_sections() {
        let kb = Arc::new(KnowledgeBase::in_memory(CompanyInfo {
            name: "Acme".into(),
            description: "Remote staffing".into(),
            ..CompanyInfo::default()
        }));
        let assembler = PromptAssembler::new(prompts()).with_knowledge(kb);
        let rendered = assembler
            .assemble(AgentKind::Brand, "staffing tagline", true)
            .await
            .render();

        let brand = rendered.find("Brand Guidelines").unwrap();
        let role = rendered.find("senior brand strategist").unwrap();
        let knowledge = rendered.find("Relevant Knowledge Base Information").unwrap();
        let request = rendered.find("User Request:").unwrap();
        assert!(brand < role && role < knowledge && knowledge < request);
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let assembler = PromptAssembler::new(prompts());
        assert!(matches!(
            assembler.assemble_key("unknown", "x", false).await,
            Err(CommandError::UnknownAgent(_))
        ));
    }
}
