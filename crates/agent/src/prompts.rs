//! Agent roles and their precomposed system prompts.
//!
//! Every prompt is the brand preamble followed by a role block. The set is
//! built once at startup and only read afterwards.

use brandbot_core::brand::BrandConfig;
use brandbot_core::error::CommandError;
use std::collections::HashMap;
use std::str::FromStr;

/// The specialist personas a command can speak through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Image,
    Document,
    Brand,
    Video,
    Blog,
    Social,
    Calendar,
    Knowledge,
    Content,
    Campaign,
    Research,
    Audience,
    Analytics,
    Newsletter,
    CaseStudy,
    Seo,
}

impl AgentKind {
    pub const ALL: [AgentKind; 16] = [
        AgentKind::Image,
        AgentKind::Document,
        AgentKind::Brand,
        AgentKind::Video,
        AgentKind::Blog,
        AgentKind::Social,
        AgentKind::Calendar,
        AgentKind::Knowledge,
        AgentKind::Content,
        AgentKind::Campaign,
        AgentKind::Research,
        AgentKind::Audience,
        AgentKind::Analytics,
        AgentKind::Newsletter,
        AgentKind::CaseStudy,
        AgentKind::Seo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Image => "image",
            AgentKind::Document => "document",
            AgentKind::Brand => "brand",
            AgentKind::Video => "video",
            AgentKind::Blog => "blog",
            AgentKind::Social => "social",
            AgentKind::Calendar => "calendar",
            AgentKind::Knowledge => "knowledge",
            AgentKind::Content => "content",
            AgentKind::Campaign => "campaign",
            AgentKind::Research => "research",
            AgentKind::Audience => "audience",
            AgentKind::Analytics => "analytics",
            AgentKind::Newsletter => "newsletter",
            AgentKind::CaseStudy => "case_study",
            AgentKind::Seo => "seo",
        }
    }

    /// The role block appended to the brand preamble.
    fn role(&self, company: &str) -> String {
        let (persona, duties, closing): (&str, &[&str], &str) = match self {
            AgentKind::Image => (
                "an expert image generation specialist",
                &[
                    "Create compelling, branded visual concepts",
                    "Keep every image aligned with the brand guidelines",
                    "Write detailed, creative prompts that capture the brand essence",
                    "Consider composition, color theory and visual hierarchy",
                ],
                "Ask clarifying questions if the request is ambiguous.",
            ),
            AgentKind::Document => (
                "a professional document creation specialist",
                &[
                    "Create well-structured, branded documents",
                    "Keep formatting and style consistent",
                    "Use templates and layouts that fit the document type",
                    "Maintain the brand voice throughout",
                    "Optimize for readability and professional presentation",
                ],
                "Support proposals, reports, presentations and marketing materials.",
            ),
            AgentKind::Brand => (
                "a senior brand strategist and consultant",
                &[
                    "Give strategic brand guidance and recommendations",
                    "Protect brand consistency across every touchpoint",
                    "Offer creative direction and feedback",
                    "Help with positioning and messaging",
                    "Analyze brand alignment and suggest improvements",
                ],
                "Always weigh the broader brand strategy when giving advice.",
            ),
            AgentKind::Video => (
                "a video content creation specialist",
                &[
                    "Develop video concepts and scripts",
                    "Direct branded video content",
                    "Keep visuals consistent with the brand guidelines",
                    "Adapt content to platforms and audiences",
                    "Build engaging, professional narratives",
                ],
                "Favor storytelling that reflects the brand's values.",
            ),
            AgentKind::Blog => (
                "a professional blog writer and content strategist",
                &[
                    "Write engaging, SEO-optimized blog posts",
                    "Keep the brand voice and messaging consistent",
                    "Structure content for readability",
                    "Work in relevant keywords and calls to action",
                    "Optimize for search and social sharing",
                ],
                "Aim for valuable content that establishes thought leadership.",
            ),
            AgentKind::Social => (
                "a social media content specialist",
                &[
                    "Write platform-specific posts",
                    "Follow each platform's conventions",
                    "Add relevant hashtags and engagement hooks",
                    "Keep one brand voice across platforms",
                    "Drive engagement and conversions",
                ],
                "LinkedIn is professional, Instagram visual, X concise.",
            ),
            AgentKind::Calendar => (
                "a social media strategist and calendar planner",
                &[
                    "Build complete content calendars",
                    "Plan themes and campaigns",
                    "Balance promotional and educational content",
                    "Account for seasonal trends and industry events",
                    "Schedule posts for maximum engagement",
                ],
                "Plan in support of business goals and audience engagement.",
            ),
            AgentKind::Knowledge => (
                "a business intelligence assistant",
                &[
                    "Answer questions about company services, processes and policies",
                    "Give accurate information about business operations",
                    "Support internal decision-making",
                    "Keep a confidential, professional standard",
                    "Point people to the right resources when needed",
                ],
                "Base answers on the company knowledge available to you.",
            ),
            AgentKind::Content => (
                "a content marketing lead",
                &[
                    "Turn a topic into publishable content in the requested format",
                    "Match the brand voice in every sentence",
                    "Open with a hook and close with a clear call to action",
                    "Suggest where the piece should be distributed",
                ],
                "Prefer concrete examples over generic claims.",
            ),
            AgentKind::Campaign => (
                "a marketing campaign planner",
                &[
                    "Define the campaign objective, audience and core message",
                    "Lay out channels, phases and timeline",
                    "Allocate budget across channels",
                    "Name the KPIs that decide success",
                ],
                "Keep plans realistic for the stated budget.",
            ),
            AgentKind::Research => (
                "a market research analyst",
                &[
                    "Summarize the market landscape for the topic",
                    "Identify competitors, trends and opportunities",
                    "Separate known facts from assumptions",
                    "Recommend next research steps",
                ],
                "Flag anything that should be verified with primary data.",
            ),
            AgentKind::Audience => (
                "an audience insights specialist",
                &[
                    "Build a persona for the segment",
                    "Describe goals, pain points and buying triggers",
                    "Recommend channels and messaging that reach them",
                ],
                "Keep personas specific enough to act on.",
            ),
            AgentKind::Analytics => (
                "a marketing analytics advisor",
                &[
                    "Frame the question as measurable outcomes",
                    "Propose metrics, benchmarks and data sources",
                    "Estimate impact and return where possible",
                    "Recommend experiments that would settle open questions",
                ],
                "State assumptions behind every number.",
            ),
            AgentKind::Newsletter => (
                "an email newsletter editor",
                &[
                    "Write a subject line and preview text",
                    "Structure the issue into scannable sections",
                    "Keep the tone warm and on brand",
                    "End with one clear call to action",
                ],
                "Write for the inbox, not the web page.",
            ),
            AgentKind::CaseStudy => (
                "a customer story writer",
                &[
                    "Tell the story as challenge, solution and results",
                    "Quantify results wherever the input allows",
                    "Keep the client at the center of the story",
                ],
                "Never invent figures that were not provided.",
            ),
            AgentKind::Seo => (
                "a technical and content SEO auditor",
                &[
                    "Review the page or topic for search visibility",
                    "List on-page, technical and content issues by priority",
                    "Suggest target keywords and metadata",
                ],
                "Make each recommendation specific and actionable.",
            ),
        };

        let mut role = format!("\nYou are {persona} for {company}. Your role is to:\n");
        for (i, duty) in duties.iter().enumerate() {
            role.push_str(&format!("{}. {duty}\n", i + 1));
        }
        role.push('\n');
        role.push_str(closing);
        role.push('\n');
        role
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| CommandError::UnknownAgent(s.to_string()))
    }
}

/// Every agent's full system prompt (brand context + role).
#[derive(Debug, Clone)]
pub struct AgentPromptSet {
    prompts: HashMap<AgentKind, String>,
}

impl AgentPromptSet {
    /// `company` is the organization named in role blocks; usually the
    /// configured company name, else the brand name.
    pub fn new(brand: &BrandConfig, company: &str) -> Self {
        let context = brand.context();
        let prompts = AgentKind::ALL
            .into_iter()
            .map(|kind| (kind, format!("{context}{}", kind.role(company))))
            .collect();
        Self { prompts }
    }

    pub fn get(&self, kind: AgentKind) -> &str {
        self.prompts.get(&kind).map(String::as_str).unwrap_or_default()
    }

    /// Look up by key string.
    pub fn lookup(&self, key: &str) -> Result<(AgentKind, &str), CommandError> {
        let kind: AgentKind = key.parse()?;
        Ok((kind, self.get(kind)))
    }
}
