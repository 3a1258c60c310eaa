use pulse_core::types::Platform;
use serde_json::json;

use super::*;

#[test]
fn linkedin_content_maps_current_actor_schema() {
    let item = json!({
        "id": "urn:li:activity:7123",
        "text": "How RSU vesting schedules interact with quarterly estimated taxes is worth understanding before your next vest date.",
        "linkedinUrl": "https://www.linkedin.com/posts/abc",
        "author": {"name": "Jane Advisor", "url": "https://www.linkedin.com/in/jane-advisor"},
        "engagement": {"likes": 120, "comments": 14, "shares": 6}
    });
    let post = normalize_linkedin_content(&item).unwrap();
    assert_eq!(post.external_id, "urn:li:activity:7123");
    assert_eq!(post.platform, Platform::Linkedin);
    assert_eq!(post.creator_name, "Jane Advisor");
    assert_eq!(
        post.creator_handle,
        "https://www.linkedin.com/in/jane-advisor"
    );
    assert_eq!(post.url, "https://www.linkedin.com/posts/abc");
    assert_eq!((post.likes, post.comments, post.shares), (120, 14, 6));
    assert!(post.post_age_hours.is_none());
}

#[test]
fn linkedin_content_builds_url_from_share_urn() {
    let item = json!({
        "urn": "7123456",
        "text": "Roth conversion windows during a market dip deserve a second look from anyone with a large deferred balance.",
        "shareUrn": "urn:li:share:7123456",
        "numLikes": 3
    });
    let post = normalize_linkedin_content(&item).unwrap();
    assert_eq!(
        post.url,
        "https://www.linkedin.com/feed/update/urn:li:share:7123456"
    );
    assert_eq!(post.likes, 3);
}

#[test]
fn linkedin_content_drops_low_quality_posts() {
    let item = json!({
        "id": "x1",
        "text": "#tax #rsu #iso #equity",
        "linkedinUrl": "https://www.linkedin.com/posts/x1"
    });
    assert!(normalize_linkedin_content(&item).is_none());
}

#[test]
fn linkedin_content_drops_items_without_text_or_url() {
    let no_text = json!({"id": "x2", "linkedinUrl": "https://example.com"});
    assert!(normalize_linkedin_content(&no_text).is_none());

    let no_url = json!({
        "id": "x3",
        "text": "A perfectly reasonable post about backdoor Roth contribution mechanics and the pro-rata rule."
    });
    assert!(normalize_linkedin_content(&no_url).is_none());
}

#[test]
fn linkedin_content_zero_engagement_is_preserved() {
    let item = json!({
        "id": "x4",
        "text": "Tax-loss harvesting only works if you actually track your lots; most custodial exports make that harder than it should be.",
        "linkedinUrl": "https://www.linkedin.com/posts/x4",
        "numLikes": 0,
        "numComments": 0
    });
    let post = normalize_linkedin_content(&item).unwrap();
    assert_eq!(post.likes, 0);
    assert_eq!(post.comments, 0);
}

#[test]
fn twitter_content_maps_classic_schema() {
    let item = json!({
        "id_str": "1790000000000000000",
        "full_text": "Underrated: the 83(b) election deadline is 30 days from grant, not from vest. Miss it and there is no do-over.",
        "user": {"name": "Tax Tweeter", "screen_name": "taxtweeter"},
        "favorite_count": 54,
        "reply_count": 9,
        "retweet_count": 12
    });
    let post = normalize_twitter_content(&item).unwrap();
    assert_eq!(post.platform, Platform::Twitter);
    assert_eq!(post.external_id, "1790000000000000000");
    assert_eq!(post.creator_handle, "taxtweeter");
    assert_eq!(
        post.url,
        "https://x.com/taxtweeter/status/1790000000000000000"
    );
    assert_eq!((post.likes, post.comments, post.shares), (54, 9, 12));
}

#[test]
fn tiktok_content_maps_stats_block() {
    let item = json!({
        "id": "74000001",
        "text": "Three things founders get wrong about QSBS eligibility, explained in under a minute without the jargon.",
        "webVideoUrl": "https://www.tiktok.com/@money/video/74000001",
        "authorMeta": {"name": "money", "nickName": "Money Talks"},
        "stats": {"diggCount": 900, "commentCount": 45, "shareCount": 30}
    });
    let post = normalize_tiktok_content(&item).unwrap();
    assert_eq!(post.platform, Platform::Tiktok);
    assert_eq!(post.creator_name, "Money Talks");
    assert_eq!(post.creator_handle, "money");
    assert_eq!((post.likes, post.comments, post.shares), (900, 45, 30));
}

#[test]
fn tiktok_creator_name_falls_back_to_handle_without_nickname() {
    let item = json!({
        "id": "74000002",
        "text": "Why backdoor Roth contributions trip up so many tech employees during their first equity windfall.",
        "webVideoUrl": "https://www.tiktok.com/@money/video/74000002",
        "authorMeta": {"name": "money"}
    });
    let post = normalize_tiktok_content(&item).unwrap();
    assert_eq!(post.creator_name, "money");
    assert_eq!(post.creator_handle, "money");
}

#[test]
fn comment_adapter_keeps_author_context_and_estimates_age() {
    let item = json!({
        "id": "urn:li:activity:9001",
        "text": "We just closed our Series B and I keep hearing about equity compensation planning. What should employees actually be doing right now?",
        "linkedinUrl": "https://www.linkedin.com/posts/founder-9001",
        "author": {
            "name": "Sam Founder",
            "publicIdentifier": "sam-founder",
            "headline": "CEO at Seriesly",
            "company": "Seriesly"
        },
        "postedAt": "2026-08-20T11:00:00Z",
        "numLikes": 40
    });
    let post = normalize_linkedin_comment(&item).unwrap();
    assert_eq!(post.creator_title.as_deref(), Some("CEO at Seriesly"));
    assert_eq!(post.creator_company.as_deref(), Some("Seriesly"));
    let age = post.post_age_hours.unwrap();
    assert!(age > 0.0, "post in the past must have positive age");
}

#[test]
fn comment_adapter_defaults_age_when_timestamp_missing() {
    let item = json!({
        "id": "urn:li:activity:9002",
        "text": "Hiring our first CFO and trying to understand what a fractional arrangement actually costs versus full time.",
        "linkedinUrl": "https://www.linkedin.com/posts/founder-9002"
    });
    let post = normalize_linkedin_comment(&item).unwrap();
    assert!((post.post_age_hours.unwrap() - 12.0).abs() < f64::EPSILON);
}

#[test]
fn comment_adapter_rejects_short_posts() {
    // 29 UTF-16 units, passes the content filter's 20 floor but not the
    // comment pipeline's 30.
    let item = json!({
        "id": "urn:li:activity:9003",
        "text": "Thoughts on the new tax bill?",
        "linkedinUrl": "https://www.linkedin.com/posts/founder-9003"
    });
    assert!(normalize_linkedin_comment(&item).is_none());
}

#[test]
fn history_adapter_requires_url_and_minimum_length() {
    let no_url = json!({
        "author": {"name": "Jane Advisor"},
        "text": "A long enough post about the estate planning conversation every client postpones."
    });
    assert!(normalize_advisor_history(&no_url).is_none());

    let too_short = json!({
        "author": {"name": "Jane Advisor"},
        "text": "Thanks!",
        "linkedinUrl": "https://www.linkedin.com/posts/ja-1"
    });
    assert!(normalize_advisor_history(&too_short).is_none());

    let ok = json!({
        "author": {"name": "Jane Advisor"},
        "text": "Most clients postpone the estate planning conversation until a liquidity event forces it.",
        "linkedinUrl": "https://www.linkedin.com/posts/ja-2",
        "postedAt": "2026-08-01T09:00:00Z",
        "numLikes": 17
    });
    let post = normalize_advisor_history(&ok).unwrap();
    assert_eq!(post.author_name, "Jane Advisor");
    assert_eq!(post.linkedin_url, "https://www.linkedin.com/posts/ja-2");
    assert_eq!(post.likes, 17);
}

#[test]
fn missing_id_mints_a_unique_fallback() {
    let base = json!({
        "text": "Donor-advised funds pair well with appreciated stock, but the bunching math changes once the standard deduction moves.",
        "linkedinUrl": "https://www.linkedin.com/posts/anon"
    });
    let a = normalize_linkedin_content(&base).unwrap();
    let b = normalize_linkedin_content(&base).unwrap();
    assert_ne!(a.external_id, b.external_id);
}
