//! Prompt builders for the scoring and generation calls.
//!
//! Every profile field has a sensible built-in fallback so a half-configured
//! advisor profile still produces usable prompts. The scoring prompts demand
//! bare JSON; the fence-stripping in the parser covers models that wrap it
//! anyway.

use pulse_core::text::sanitize_text;
use pulse_db::advisor_posts::AdvisorPostRow;
use pulse_db::comment_feed::CommentFeedRow;
use pulse_db::content_feed::ContentFeedRow;
use pulse_db::profile::{AdvisorProfileRow, ContentPreferenceRow, VoiceSampleRow};

use crate::generate::OutreachLead;
use crate::parse::truncate_chars;

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn or_num(value: i32, fallback: i32) -> i32 {
    if value == 0 {
        fallback
    } else {
        value
    }
}

/// Scoring prompt for one unscored content-feed post.
#[must_use]
pub fn content_scoring_prompt(post: &ContentFeedRow, profile: &AdvisorProfileRow) -> String {
    let text = sanitize_text(&post.post_text);
    format!(
        "Score this social media post for a financial advisor's content strategy.\n\
         \n\
         ADVISOR CONTEXT:\n\
         - Specialization: {specialization}\n\
         - Target audience: {professions} ages {age_min}-{age_max}\n\
         - Topics they cover: {topics}\n\
         \n\
         POST TO SCORE:\n\
         Platform: {platform}\n\
         Creator: {creator}\n\
         Text: {text}\n\
         Engagement: {likes} likes, {comments} comments, {shares} shares\n\
         \n\
         SCORING RULES (CRITICAL):\n\
         - expertise_signal (0-100): Does this content demonstrate expertise?\n\
           * 0 engagement = score 0-10 max. NEVER above 20 if likes+comments+shares = 0\n\
           * 50-500 likes = 30-60\n\
           * 500+ likes = 60-90\n\
           * Velocity matters: 50 likes in 2 hours > 500 likes in 3 days\n\
         - icp_relevance (0-100): How closely does this map to the advisor's expertise areas and audience interests?\n\
         - suggested_angle: One line - how could the advisor create their own post riffing on this?\n\
         \n\
         Respond ONLY with valid JSON, no markdown:\n\
         {{\"expertise_signal\": <number>, \"icp_relevance\": <number>, \"suggested_angle\": \"<string>\"}}",
        specialization = or(&profile.specialization, "equity compensation planning"),
        professions = or(&profile.icp_professions, "engineers, attorneys, tech employees"),
        age_min = or_num(profile.icp_age_min, 25),
        age_max = or_num(profile.icp_age_max, 45),
        topics = or(
            &profile.topics_always,
            "RSUs, ISOs, NSOs, Solo 401(k), Roth conversions, concentrated stock"
        ),
        platform = post.platform,
        creator = or(&post.creator_name, "Unknown"),
        text = truncate_chars(&text, 1500),
        likes = post.likes,
        comments = post.comments,
        shares = post.shares,
    )
}

/// Scoring prompt for one unscored comment-feed post.
#[must_use]
pub fn comment_scoring_prompt(post: &CommentFeedRow, profile: &AdvisorProfileRow) -> String {
    let text = sanitize_text(&post.post_text);
    format!(
        "Score this LinkedIn post for comment opportunity value for a financial advisor.\n\
         \n\
         ADVISOR: {name} - {specialization}\n\
         TARGET AUDIENCE: {professions}\n\
         \n\
         POST:\n\
         Author: {author} - {title} at {company}\n\
         Text: {text}\n\
         Engagement: {likes} likes, {comments} comments\n\
         Age: {age} hours\n\
         \n\
         SCORE ON FOUR DIMENSIONS (each 0-100):\n\
         1. icp_magnet: How likely is the advisor's target demographic engaging with this post/creator?\n\
         2. engagement_window: Is this post in the sweet spot (2-8 hours, accelerating)? Posts past peak = low score.\n\
         3. authority_positioning: Can the advisor demonstrate expertise here without being salesy?\n\
         4. conversation_starter: Will engaging here create a natural path to a follow or DM?\n\
         \n\
         Also provide:\n\
         - comment_priority: weighted composite (icp_magnet x 0.3 + engagement_window x 0.25 + authority_positioning x 0.25 + conversation_starter x 0.2)\n\
         - topic_tag: one of [tech_careers, legal_careers, financial, equity_comp, leadership, investing, other]\n\
         \n\
         Respond ONLY with valid JSON, no markdown:\n\
         {{\"icp_magnet\": <n>, \"engagement_window\": <n>, \"authority_positioning\": <n>, \"conversation_starter\": <n>, \"comment_priority\": <n>, \"topic_tag\": \"<string>\"}}",
        name = or(&profile.full_name, "Financial Advisor"),
        specialization = or(&profile.specialization, "equity compensation planning"),
        professions = or(&profile.icp_professions, "engineers, attorneys, tech employees"),
        author = or(&post.creator_name, "Unknown"),
        title = post.creator_title,
        company = post.creator_company,
        text = truncate_chars(&text, 1500),
        likes = post.likes,
        comments = post.comments,
        age = post.post_age_hours.unwrap_or(0.0),
    )
}

/// Ghostwriting prompt for one post draft.
///
/// Recent topic tags and hook types from the advisor's last ten posts feed
/// the anti-repetition and structural-variety sections.
#[must_use]
pub fn draft_prompt(
    source: &ContentFeedRow,
    profile: &AdvisorProfileRow,
    history: &[AdvisorPostRow],
    voice_samples: &[VoiceSampleRow],
    prefs: &[ContentPreferenceRow],
) -> String {
    let recent_topics: Vec<&str> = history
        .iter()
        .take(10)
        .filter_map(|p| p.topic_tags.as_ref())
        .flatten()
        .map(String::as_str)
        .collect();
    let recent_hooks: Vec<&str> = history
        .iter()
        .take(10)
        .filter_map(|p| p.hook_type.as_deref())
        .collect();
    let voice_text = voice_samples
        .iter()
        .map(|s| format!("---\n{}", s.sample_text))
        .collect::<Vec<_>>()
        .join("\n");
    let pref_labels = prefs
        .iter()
        .map(|p| p.label.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let source_text = sanitize_text(&source.post_text);

    format!(
        "You are a LinkedIn post ghostwriter for a financial advisor. Generate ONE post draft.\n\
         \n\
         ADVISOR:\n\
         Name: {name}\n\
         Firm: {firm}\n\
         Specialization: {specialization}\n\
         Tagline: {tagline}\n\
         \n\
         VOICE SAMPLES (match this writing style exactly):\n\
         {voice}\n\
         \n\
         TONE RULES:\n\
         {tone}\n\
         \n\
         POST RULES:\n\
         - Preferred length: {length}\n\
         - Preferred formats: {formats}\n\
         - Content preferences: {prefs}\n\
         \n\
         ANTI-REPETITION (do NOT draft on these recent topics):\n\
         {topics}\n\
         \n\
         STRUCTURAL VARIETY (do NOT use these hook types - use something different):\n\
         {hooks}\n\
         \n\
         TOPICS TO NEVER COVER:\n\
         {never}\n\
         \n\
         COMPLIANCE RULES:\n\
         {compliance}\n\
         \n\
         SOURCE POST TO RIFF ON:\n\
         Platform: {platform}\n\
         Text: {source_text}\n\
         Engagement: {likes} likes, {comments} comments\n\
         Suggested angle: {angle}\n\
         \n\
         CRITICAL RULES:\n\
         - Never fabricate statistics. Only use data from the source post with traceable URL.\n\
         - Never use engagement bait: \"like if you agree,\" \"comment YES,\" \"share this,\" \"tag someone\"\n\
         - Match the advisor's voice samples exactly - not generic AI writing\n\
         - Post must be ready to edit in 2-3 minutes, not a rough outline\n\
         \n\
         Respond ONLY with valid JSON, no markdown:\n\
         {{\n\
           \"draft_text\": \"<full post text>\",\n\
           \"topic_tags\": [\"<tag1>\", \"<tag2>\"],\n\
           \"hook_type\": \"<contrarian|question|data_driven|story|myth_bust|timely|framework>\",\n\
           \"image_suggestion\": \"<one-line image idea or null>\",\n\
           \"hashtags\": [\"<tag1>\", \"<tag2>\"] or null,\n\
           \"source_urls\": \"<url or null>\",\n\
           \"continuity_reference\": \"<reference to previous post or null>\"\n\
         }}",
        name = or(&profile.full_name, "Advisor"),
        firm = profile.firm,
        specialization = or(&profile.specialization, "equity compensation"),
        tagline = profile.tagline,
        voice = or(
            &voice_text,
            "No samples yet - write in a punchy, direct, smart-friend-at-a-bar tone."
        ),
        tone = or(
            &profile.tone_rules,
            "Short, punchy sentences. No fluff. Like a smart friend at a bar."
        ),
        length = or(&profile.preferred_length, "Under 200 words"),
        formats = or(
            &profile.preferred_formats,
            "Contrarian hooks, data-driven analysis"
        ),
        prefs = or(&pref_labels, "Contrarian takes, data analysis"),
        topics = or(&recent_topics.join(", "), "none yet"),
        hooks = or(&recent_hooks.join(", "), "none yet"),
        never = or(
            &profile.topics_never,
            "Crypto, insurance products, specific stock picks, politics"
        ),
        compliance = or(
            &profile.compliance_rules,
            "No guarantees, no forward-looking statements, no fabricated scenarios"
        ),
        platform = source.platform,
        source_text = truncate_chars(&source_text, 2000),
        likes = source.likes,
        comments = source.comments,
        angle = or(
            source.suggested_angle.as_deref().unwrap_or(""),
            "Create a unique take on this topic"
        ),
    )
}

/// Prompt for a ready-to-post comment on a high-priority comment-feed post.
#[must_use]
pub fn comment_prompt(
    post: &CommentFeedRow,
    profile: &AdvisorProfileRow,
    voice_samples: &[VoiceSampleRow],
) -> String {
    let voice_text = voice_samples
        .iter()
        .map(|s| format!("---\n{}", s.sample_text))
        .collect::<Vec<_>>()
        .join("\n");
    let text = sanitize_text(&post.post_text);

    format!(
        "Write a LinkedIn comment for a financial advisor to post on this post.\n\
         \n\
         ADVISOR: {name} - {specialization}\n\
         EXPERTISE AREAS: {topics}\n\
         \n\
         COMMENT VOICE SAMPLES (match this style):\n\
         {voice}\n\
         \n\
         POST:\n\
         Author: {author} - {title} at {company}\n\
         Text: {text}\n\
         \n\
         REQUIREMENTS:\n\
         - Minimum 15 words, but substance is the actual requirement\n\
         - Must add genuine insight, personal experience, smart question, or specific perspective\n\
         - Vary format: quick insight + experience, contrarian take, question to OP, relevant data point\n\
         - NEVER: generic encouragement (\"Great post!\"), obvious AI language, self-promotion, pitching\n\
         - Goal: get the OP or other commenters to click the advisor's profile\n\
         \n\
         Respond ONLY with the comment text, nothing else. No quotes, no JSON.",
        name = or(&profile.full_name, "Advisor"),
        specialization = or(&profile.specialization, "equity compensation planning"),
        topics = or(
            &profile.topics_always,
            "RSUs, ISOs, Solo 401(k), Roth conversions, concentrated stock"
        ),
        voice = or(
            &voice_text,
            "Quick, substantive, adds genuine value. Never preachy. Humor when natural."
        ),
        author = or(&post.creator_name, "Unknown"),
        title = post.creator_title,
        company = post.creator_company,
        text = truncate_chars(&text, 1500),
    )
}

/// Prompt for a first-touch DM to a lead who engaged with the advisor.
#[must_use]
pub fn outreach_prompt(lead: &OutreachLead, profile: &AdvisorProfileRow) -> String {
    format!(
        "Write a LinkedIn DM conversation starter for a financial advisor.\n\
         \n\
         ADVISOR: {name} - {specialization}\n\
         TAGLINE: {tagline}\n\
         \n\
         LEAD:\n\
         Name: {lead_name}\n\
         Title: {lead_title}\n\
         Company: {lead_company}\n\
         How they engaged: {interaction}\n\
         \n\
         RULES:\n\
         - Maximum 2-3 sentences. Start a conversation, don't deliver a pitch.\n\
         - MUST reference the actual interaction - never generic.\n\
         - Never suggest pitching in the first message.\n\
         - Tone: warm, direct, professional but not corporate.\n\
         \n\
         Respond ONLY with the message text, nothing else.",
        name = or(&profile.full_name, "Advisor"),
        specialization = or(&profile.specialization, "equity compensation planning"),
        tagline = profile.tagline,
        lead_name = lead.name,
        lead_title = lead.title,
        lead_company = lead.company,
        interaction = lead.interaction_text,
    )
}
