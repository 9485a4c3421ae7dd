//! Every slash command the bot exposes.

use super::{AgentCommand, CommandSpec, OptionSpec, Presentation};
use crate::prompts::AgentKind;

pub static AGENT_COMMANDS: &[AgentCommand] = &[
    AgentCommand {
        name: "image",
        description: "Generate branded image concepts and detailed prompts",
        agent: AgentKind::Image,
        options: &[
            OptionSpec::required("prompt", "What the image should show"),
            OptionSpec::optional("style", "Visual style", "default"),
        ],
        example: r#"/image prompt:"logo design" style:"modern""#,
        title: "🎨 Image Concept Generated!",
        summary: "**Original Request:** {prompt}\n**Style:** {style}",
        template: "Create a branded image concept for {brand}.

Original Request: {prompt}
Style Preference: {style}
Brand Guidelines: {style_guidelines}

Write a detailed image-generation prompt that blends our brand aesthetic with the request. \
It should work well for our brand identity.",
        presentation: Presentation::Single {
            label: "AI Response",
            next_steps: Some(
                "Use this concept with your preferred image generation tool (DALL-E, Midjourney, etc.) or run /image_generate",
            ),
        },
    },
    AgentCommand {
        name: "document",
        description: "Create branded documents with AI assistance",
        agent: AgentKind::Document,
        options: &[
            OptionSpec::required("document_type", "Proposal, report, one-pager, ..."),
            OptionSpec::required("topic", "What the document is about"),
            OptionSpec::optional("length", "short, medium or long", "medium"),
        ],
        example: r#"/document document_type:"proposal" topic:"new campaign" length:"long""#,
        title: "📄 Document Created!",
        summary: "**Type:** {document_type}\n**Topic:** {topic}\n**Length:** {length}",
        template: "Create a {length} {document_type} for {brand} on the topic: {topic}

Brand Guidelines:
- Style: {style_guidelines}
- Voice & Tone: {voice_tone}

Requirements:
1. Use a professional document structure
2. Carry the brand voice and messaging
3. Keep the content engaging and well organized
4. Include the sections and formatting this document type needs
5. Write for the intended audience and purpose

Provide a complete draft.",
        presentation: Presentation::File {
            label: "📋 Document Preview",
            preview_chars: 500,
            filename: "{document_type}_{topic}.txt",
            heading: "# {document_type}: {topic}",
        },
    },
    AgentCommand {
        name: "brand",
        description: "Get strategic brand guidance and recommendations",
        agent: AgentKind::Brand,
        options: &[OptionSpec::required("query", "Your brand question")],
        example: r#"/brand query:"What colors should I use for our new campaign?""#,
        title: "🏢 Brand Strategic Guidance",
        summary: "**Your Query:** {query}",
        template: "As brand strategist for {brand}, give guidance on this query:

Query: {query}

Current Brand Context:
- Style Guidelines: {style_guidelines}
- Voice & Tone: {voice_tone}

Cover:
1. Strategic recommendations
2. Brand alignment considerations
3. Practical implementation steps
4. Risks to watch
5. Next actions

Keep it actionable and specific to our brand identity.",
        presentation: Presentation::Chunked {
            label: "📋 Brand Guidance",
            next_steps: None,
            echo: None,
            footer: Some("Brand Assistant for {brand}"),
        },
    },
    AgentCommand {
        name: "video",
        description: "Generate video content strategies and scripts",
        agent: AgentKind::Video,
        options: &[
            OptionSpec::required("prompt", "Video concept"),
            OptionSpec::optional("duration", "Length in seconds", "10").integer(),
            OptionSpec::optional("style", "Visual style", "default"),
        ],
        example: r#"/video prompt:"product showcase" duration:15 style:"cinematic""#,
        title: "🎬 Video Content Strategy",
        summary: "**Concept:** {prompt}\n**Duration:** {duration}s\n**Style:** {style}",
        template: "Create a video content strategy for {brand}.

Video Concept: {prompt}
Duration: {duration} seconds
Style: {style}

Brand Guidelines:
- Style: {style_guidelines}
- Voice & Tone: {voice_tone}

Include:
1. Concept and narrative structure
2. Visual style recommendations
3. Script outline or key talking points
4. Technical specifications
5. Brand integration ideas
6. Call to action",
        presentation: Presentation::Chunked {
            label: "🎯 Video Strategy",
            next_steps: Some("Use this strategy with your preferred video creation tools (Runway, Luma, etc.)"),
            echo: None,
            footer: None,
        },
    },
    AgentCommand {
        name: "blog",
        description: "Create SEO-optimized blog posts",
        agent: AgentKind::Blog,
        options: &[
            OptionSpec::required("topic", "Blog topic"),
            OptionSpec::optional("keywords", "Target keywords", "general industry terms"),
            OptionSpec::optional("length", "short, medium or long", "medium"),
        ],
        example: r#"/blog topic:"AI in business" keywords:"automation, efficiency" length:"long""#,
        title: "📝 Blog Post Created!",
        summary: "**Topic:** {topic}\n**Keywords:** {keywords}\n**Length:** {length}",
        template: "Write a blog post for {brand} on the topic: {topic}

Requirements:
- Length: {length}
- Target Keywords: {keywords}
- An SEO-optimized title and meta description
- Clear headings and subheadings
- A call to action at the end
- The {company} brand voice and expertise

Return the complete post, formatted in Markdown.",
        presentation: Presentation::File {
            label: "📋 Blog Preview",
            preview_chars: 800,
            filename: "blog_{topic}.md",
            heading: "# Blog Post: {topic}",
        },
    },
    AgentCommand {
        name: "social",
        description: "Create platform-specific social media posts",
        agent: AgentKind::Social,
        options: &[
            OptionSpec::required("platform", "LinkedIn, Instagram, X, Facebook, TikTok"),
            OptionSpec::required("topic", "What the post is about"),
            OptionSpec::optional("hashtags", "Hashtags to include", ""),
        ],
        example: r##"/social platform:"LinkedIn" topic:"team productivity" hashtags:"#productivity #teamwork""##,
        title: "📱 Social Media Post Created!",
        summary: "**Platform:** {platform}\n**Topic:** {topic}",
        template: "Write a {platform} post for {brand} about: {topic}

Hashtags to include: {hashtags}

Platform conventions:
- LinkedIn: professional, thought leadership
- Instagram: visual, story-driven
- X: concise, conversation-starting
- Facebook: community-focused
- TikTok: trendy, authentic

Add engagement hooks and relevant hashtags. Keep the {company} brand voice.",
        presentation: Presentation::Chunked {
            label: "📝 {platform} Post",
            next_steps: None,
            echo: Some(("🏷️ Requested Hashtags", "hashtags")),
            footer: None,
        },
    },
    AgentCommand {
        name: "calendar",
        description: "Generate social media content calendars",
        agent: AgentKind::Calendar,
        options: &[
            OptionSpec::optional("duration", "Time span to plan", "1 month"),
            OptionSpec::optional("focus", "Theme or campaign focus", "general"),
        ],
        example: r#"/calendar duration:"2 weeks" focus:"product launch""#,
        title: "📅 Social Media Calendar Created!",
        summary: "**Duration:** {duration}\n**Focus:** {focus}",
        template: "Create a social media content calendar for {brand}.

Duration: {duration}
Focus Area: {focus}

Requirements:
1. Cover LinkedIn, Instagram and X
2. Mix educational, promotional, behind-the-scenes and industry content
3. Give posting times and frequency
4. Suggest a theme for each week
5. Include hashtags and engagement tactics
6. Support {company}'s business goals and audience

Lay it out as a dated schedule with specific post ideas.",
        presentation: Presentation::File {
            label: "📋 Calendar Preview",
            preview_chars: 800,
            filename: "social_calendar_{duration}.md",
            heading: "# Social Media Calendar - {duration}\n## Focus: {focus}",
        },
    },
    AgentCommand {
        name: "ask",
        description: "Ask business questions about the company",
        agent: AgentKind::Knowledge,
        options: &[OptionSpec::required("question", "Your question")],
        example: r#"/ask question:"What are our core service offerings?""#,
        title: "🤔 Business Question Answered",
        summary: "**Your Question:** {question}",
        template: "Answer this question about {company}:

Question: {question}

Base the answer on:
1. The company knowledge provided
2. General business best practice
3. {company}'s positioning as a professional service provider
4. Practical, actionable advice

If specific company information is missing, say so and suggest where to find it.",
        presentation: Presentation::Chunked {
            label: "💡 Answer",
            next_steps: None,
            echo: None,
            footer: Some("💡 For specific company policies, consult internal documentation"),
        },
    },
    AgentCommand {
        name: "content",
        description: "Draft marketing content in any format",
        agent: AgentKind::Content,
        options: &[
            OptionSpec::required("topic", "Content topic"),
            OptionSpec::optional("format", "article, landing page, script, ...", "article"),
        ],
        example: r#"/content topic:"remote onboarding" format:"landing page""#,
        title: "✍️ Content Drafted",
        summary: "**Topic:** {topic}\n**Format:** {format}",
        template: "Draft a {format} for {brand} about: {topic}

Match the brand voice ({voice_tone}), open with a hook, and finish with a call to action.",
        presentation: Presentation::Chunked {
            label: "📄 Draft",
            next_steps: None,
            echo: None,
            footer: None,
        },
    },
    AgentCommand {
        name: "campaign",
        description: "Plan a marketing campaign",
        agent: AgentKind::Campaign,
        options: &[
            OptionSpec::required("goal", "What the campaign should achieve"),
            OptionSpec::optional("audience", "Who it targets", "our core customers"),
            OptionSpec::optional("budget", "Available budget", "not specified"),
        ],
        example: r#"/campaign goal:"100 demo bookings" audience:"SaaS founders" budget:"$5k""#,
        title: "🚀 Campaign Plan",
        summary: "**Goal:** {goal}\n**Audience:** {audience}\n**Budget:** {budget}",
        template: "Plan a marketing campaign for {brand}.

Goal: {goal}
Audience: {audience}
Budget: {budget}

Give the core message, channels, phased timeline, budget split and KPIs.",
        presentation: Presentation::Chunked {
            label: "📋 Campaign Plan",
            next_steps: None,
            echo: None,
            footer: None,
        },
    },
    AgentCommand {
        name: "research",
        description: "Research a market, competitor or trend",
        agent: AgentKind::Research,
        options: &[OptionSpec::required("topic", "What to research")],
        example: r#"/research topic:"virtual assistant market in Europe""#,
        title: "🔎 Research Brief",
        summary: "**Topic:** {topic}",
        template: "Prepare a research brief for {brand} on: {topic}

Cover the landscape, competitors, trends, opportunities and open questions.",
        presentation: Presentation::Chunked {
            label: "📊 Findings",
            next_steps: None,
            echo: None,
            footer: None,
        },
    },
    AgentCommand {
        name: "audience",
        description: "Build an audience persona",
        agent: AgentKind::Audience,
        options: &[OptionSpec::required("segment", "Audience segment")],
        example: r#"/audience segment:"operations managers at agencies""#,
        title: "👥 Audience Persona",
        summary: "**Segment:** {segment}",
        template: "Build an audience persona for {brand} for this segment: {segment}

Include goals, pain points, buying triggers, objections, channels and messaging that lands.",
        presentation: Presentation::Chunked {
            label: "🧭 Persona",
            next_steps: None,
            echo: None,
            footer: None,
        },
    },
    AgentCommand {
        name: "pulse",
        description: "Check the marketing pulse on a topic",
        agent: AgentKind::Analytics,
        options: &[OptionSpec::required("topic", "Topic or channel")],
        example: r#"/pulse topic:"LinkedIn engagement""#,
        title: "📈 Marketing Pulse",
        summary: "**Topic:** {topic}",
        template: "Give {brand} a marketing pulse check on: {topic}

Suggest the metrics to watch, healthy benchmarks, likely signals and quick wins.",
        presentation: Presentation::Chunked {
            label: "📈 Pulse",
            next_steps: None,
            echo: None,
            footer: None,
        },
    },
    AgentCommand {
        name: "roi",
        description: "Estimate the return on a marketing initiative",
        agent: AgentKind::Analytics,
        options: &[
            OptionSpec::required("initiative", "What is being invested in"),
            OptionSpec::optional("investment", "Amount or effort", "not specified"),
        ],
        example: r#"/roi initiative:"webinar series" investment:"$3k""#,
        title: "💰 ROI Estimate",
        summary: "**Initiative:** {initiative}\n**Investment:** {investment}",
        template: "Estimate the return on this initiative for {brand}.

Initiative: {initiative}
Investment: {investment}

State assumptions, expected outcomes, payback period and how to measure it.",
        presentation: Presentation::Chunked {
            label: "💰 ROI Analysis",
            next_steps: None,
            echo: None,
            footer: None,
        },
    },
    AgentCommand {
        name: "growth",
        description: "Suggest growth experiments for a goal",
        agent: AgentKind::Analytics,
        options: &[OptionSpec::required("goal", "Growth goal")],
        example: r#"/growth goal:"double newsletter signups""#,
        title: "🌱 Growth Plan",
        summary: "**Goal:** {goal}",
        template: "Propose growth experiments for {brand} to reach: {goal}

For each experiment give the hypothesis, effort, expected impact and success metric.",
        presentation: Presentation::Chunked {
            label: "🧪 Experiments",
            next_steps: None,
            echo: None,
            footer: None,
        },
    },
    AgentCommand {
        name: "newsletter",
        description: "Write an email newsletter issue",
        agent: AgentKind::Newsletter,
        options: &[
            OptionSpec::required("topic", "Issue topic"),
            OptionSpec::optional("audience", "Who receives it", "subscribers"),
        ],
        example: r#"/newsletter topic:"Q3 product updates" audience:"customers""#,
        title: "📧 Newsletter Created!",
        summary: "**Topic:** {topic}\n**Audience:** {audience}",
        template: "Write a newsletter issue for {brand}.

Topic: {topic}
Audience: {audience}

Include a subject line, preview text, sections and one call to action. Format in Markdown.",
        presentation: Presentation::File {
            label: "📋 Newsletter Preview",
            preview_chars: 800,
            filename: "newsletter_{topic}.md",
            heading: "# Newsletter: {topic}",
        },
    },
    AgentCommand {
        name: "case_study",
        description: "Write a customer case study",
        agent: AgentKind::CaseStudy,
        options: &[
            OptionSpec::required("client", "Client name"),
            OptionSpec::required("challenge", "The problem they had"),
            OptionSpec::optional("results", "Outcomes achieved", "not provided"),
        ],
        example: r#"/case_study client:"Northwind" challenge:"slow hiring" results:"time-to-hire down 40%""#,
        title: "📚 Case Study Created!",
        summary: "**Client:** {client}\n**Challenge:** {challenge}",
        template: "Write a case study for {brand}.

Client: {client}
Challenge: {challenge}
Results: {results}

Structure it as challenge, solution, results and a client quote placeholder. Format in Markdown.",
        presentation: Presentation::File {
            label: "📋 Case Study Preview",
            preview_chars: 800,
            filename: "case_study_{client}.md",
            heading: "# Case Study: {client}",
        },
    },
    AgentCommand {
        name: "brand_guardian",
        description: "Check content against the brand guidelines",
        agent: AgentKind::Brand,
        options: &[OptionSpec::required("content", "The content to review")],
        example: r#"/brand_guardian content:"Our new tagline: Work smarter, not harder""#,
        title: "🛡️ Brand Review",
        summary: "**Reviewed Content:** {content}",
        template: "Review this content against the {brand} brand guidelines.

Content: {content}

Guidelines:
- Style: {style_guidelines}
- Voice & Tone: {voice_tone}

Score the alignment out of 10, list what works, what does not, and give a revised version.",
        presentation: Presentation::Chunked {
            label: "🛡️ Review",
            next_steps: None,
            echo: None,
            footer: None,
        },
    },
    AgentCommand {
        name: "seo_audit",
        description: "Audit a page or topic for SEO",
        agent: AgentKind::Seo,
        options: &[OptionSpec::required("url_or_topic", "Page URL or topic")],
        example: r#"/seo_audit url_or_topic:"https://example.com/services""#,
        title: "🔍 SEO Audit",
        summary: "**Target:** {url_or_topic}",
        template: "Run an SEO audit for {brand} on: {url_or_topic}

List issues by priority (on-page, technical, content), target keywords, and suggested title and meta description.",
        presentation: Presentation::Chunked {
            label: "🔍 Audit",
            next_steps: None,
            echo: None,
            footer: None,
        },
    },
];

/// Commands with bespoke handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityKind {
    ImageGenerate,
    LearnUrl,
    UploadDoc,
    AddInfo,
    KnowledgeStatus,
    Help,
    Test,
}

impl UtilityKind {
    pub fn spec(self) -> CommandSpec {
        match self {
            UtilityKind::ImageGenerate => IMAGE_GENERATE,
            UtilityKind::LearnUrl => LEARN_URL,
            UtilityKind::UploadDoc => UPLOAD_DOC,
            UtilityKind::AddInfo => ADD_INFO,
            UtilityKind::KnowledgeStatus => KNOWLEDGE_STATUS,
            UtilityKind::Help => HELP,
            UtilityKind::Test => TEST,
        }
    }
}

const IMAGE_GENERATE: CommandSpec = CommandSpec {
    name: "image_generate",
    description: "Generate an actual branded image with the OpenAI Images API",
    options: &[
        OptionSpec::required("prompt", "What the image should show"),
        OptionSpec::optional("style", "Visual style", "default"),
    ],
    example: r#"/image_generate prompt:"team at work" style:"flat illustration""#,
};

const LEARN_URL: CommandSpec = CommandSpec {
    name: "learn_url",
    description: "Teach the bot from website content",
    options: &[OptionSpec::required("url", "Page to learn from")],
    example: r#"/learn_url url:"https://example.com/about""#,
};

const UPLOAD_DOC: CommandSpec = CommandSpec {
    name: "upload_doc",
    description: "Upload a .pdf, .docx, .txt or .md document for the bot to learn from",
    options: &[OptionSpec::required("document", "The file to learn from").attachment()],
    example: "/upload_doc document:[attach a .pdf, .docx, .txt or .md file]",
};

const ADD_INFO: CommandSpec = CommandSpec {
    name: "add_info",
    description: "Add a fact to the knowledge base",
    options: &[
        OptionSpec::required("title", "Short title, replaces an entry with the same title"),
        OptionSpec::required("content", "The information"),
    ],
    example: r#"/add_info title:"Office hours" content:"Mon-Fri 9am-6pm EST""#,
};

const KNOWLEDGE_STATUS: CommandSpec = CommandSpec {
    name: "knowledge_status",
    description: "Check knowledge base status and sources",
    options: &[],
    example: "/knowledge_status",
};

const HELP: CommandSpec = CommandSpec {
    name: "help",
    description: "Show available commands and agent capabilities",
    options: &[],
    example: "/help",
};

const TEST: CommandSpec = CommandSpec {
    name: "test",
    description: "Check that the bot and its AI providers are configured",
    options: &[],
    example: "/test",
};

pub static UTILITY_COMMANDS: &[(UtilityKind, CommandSpec)] = &[
    (UtilityKind::ImageGenerate, IMAGE_GENERATE),
    (UtilityKind::LearnUrl, LEARN_URL),
    (UtilityKind::UploadDoc, UPLOAD_DOC),
    (UtilityKind::AddInfo, ADD_INFO),
    (UtilityKind::KnowledgeStatus, KNOWLEDGE_STATUS),
    (UtilityKind::Help, HELP),
    (UtilityKind::Test, TEST),
];

/// A command found by name.
#[derive(Debug, Clone, Copy)]
pub enum Command {
    Agent(&'static AgentCommand),
    Utility(UtilityKind),
}

pub fn find(name: &str) -> Option<Command> {
    let name = name.trim().trim_start_matches('/');
    AGENT_COMMANDS
        .iter()
        .find(|c| c.name == name)
        .map(Command::Agent)
        .or_else(|| {
            UTILITY_COMMANDS
                .iter()
                .find(|(_, spec)| spec.name == name)
                .map(|(kind, _)| Command::Utility(*kind))
        })
}

/// Registration/help metadata for every command, agent commands first.
pub fn all_specs() -> Vec<CommandSpec> {
    AGENT_COMMANDS
        .iter()
        .map(CommandSpec::from)
        .chain(UTILITY_COMMANDS.iter().map(|(_, spec)| *spec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_discord_safe() {
        let specs = all_specs();
        let mut seen = HashSet::new();
        for spec in &specs {
            assert!(seen.insert(spec.name), "duplicate command {}", spec.name);
            assert!(spec.name.len() <= 32);
            assert!(spec.name.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
            assert!(spec.description.len() <= 100, "{}", spec.name);
            for option in spec.options {
                assert!(option.description.len() <= 100, "{}.{}", spec.name, option.name);
            }
        }
        assert_eq!(specs.len(), AGENT_COMMANDS.len() + UTILITY_COMMANDS.len());
    }

    #[test]
    fn required_options_come_first() {
        // Discord rejects optional options placed before required ones
        for spec in all_specs() {
            let first_optional = spec.options.iter().position(|o| !o.required);
            let last_required = spec.options.iter().rposition(|o| o.required);
            if let (Some(opt), Some(req)) = (first_optional, last_required) {
                assert!(req < opt, "{}", spec.name);
            }
        }
    }

    #[test]
    fn find_by_name() {
        assert!(matches!(find("brand"), Some(Command::Agent(c)) if c.agent == AgentKind::Brand));
        assert!(matches!(find("/ask"), Some(Command::Agent(c)) if c.agent == AgentKind::Knowledge));
        assert!(matches!(find("help"), Some(Command::Utility(UtilityKind::Help))));
        assert!(find("nope").is_none());
    }

    #[test]
    fn templates_only_use_known_placeholders() {
        let known = ["brand", "company", "style_guidelines", "voice_tone"];
        for cmd in AGENT_COMMANDS {
            for text in [cmd.template, cmd.summary] {
                let mut rest = text;
                while let Some(open) = rest.find('{') {
                    let after = &rest[open + 1..];
                    let close = after.find('}').unwrap();
                    let name = &after[..close];
                    assert!(
                        known.contains(&name) || cmd.options.iter().any(|o| o.name == name),
                        "{}: unknown placeholder {{{name}}}",
                        cmd.name
                    );
                    rest = &after[close + 1..];
                }
            }
        }
    }
}
