//! HTML reporter: generates a self-contained recommendations page
//!
//! Embeds the ranked authors as JSON and renders the cards client-side
//! with vanilla JS (filter buttons, tweet embeds with a text fallback).

use super::csv_report::{profile_url, RecommendationRow};
use crate::analyzer::ranking::by_bucket_then_rate;
use crate::config::Config;
use crate::{format_percent, truncate_chars, MAX_SAMPLE_CHARS};
use chrono::DateTime;
use serde::Serialize;

pub const HTML_FILENAME: &str = "recommendations.html";

/// Escapes serialized JSON so it can sit inside a `<script>` block
fn escape_json_for_script(s: &str) -> String {
    // serde_json already escapes quotes/backslashes; only the closing tag
    // and HTML comment openers can break out of the block.
    s.replace("</", "<\\/").replace("<!--", "<\\!--")
}

/// Reporter that generates a self-contained HTML page
pub struct HtmlReporter {
    subtitle: Option<String>,
    /// Used to rebuild profile links missing from the rows
    profile_base_url: String,
}

/// Per-author card payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsCard {
    recommendation: String,
    slug: String,
    username: String,
    name: String,
    profile_url: String,
    followers: String,
    engagement: u64,
    er_pct: String,
    reason: String,
    joined: String,
    listed: String,
    ratio: String,
    tweets_found: u64,
    likes: u64,
    retweets: u64,
    replies: u64,
    tweets: Vec<JsTweet>,
}

/// Either an embeddable tweet url or the sample text shown in its place
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsTweet {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl HtmlReporter {
    pub fn new() -> Self {
        Self {
            subtitle: None,
            profile_base_url: Config::DEFAULT_PROFILE_BASE_URL.to_string(),
        }
    }

    pub fn profile_base_url(mut self, base: impl Into<String>) -> Self {
        self.profile_base_url = base.into();
        self
    }

    /// Line shown under the page title (usually the tracked query labels)
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        let subtitle = subtitle.into();
        self.subtitle = if subtitle.trim().is_empty() {
            None
        } else {
            Some(subtitle)
        };
        self
    }

    /// Generate the full HTML page. Rows are re-sorted by bucket then rate.
    pub fn report(&self, rows: &[RecommendationRow]) -> String {
        let mut ordered: Vec<&RecommendationRow> = rows.iter().collect();
        ordered.sort_by(|a, b| {
            by_bucket_then_rate(
                a.recommendation,
                a.engagement_rate,
                b.recommendation,
                b.engagement_rate,
            )
        });

        let cards: Vec<JsCard> = ordered
            .into_iter()
            .map(|row| to_js_card(row, &self.profile_base_url))
            .collect();
        let data_json = serde_json::to_string(&cards).unwrap_or_else(|_| "[]".to_string());
        let meta = serde_json::json!({
            "subtitle": self.subtitle.as_deref().unwrap_or(""),
            "total": cards.len(),
        });

        let mut html = String::with_capacity(16_384 + data_json.len());
        html.push_str(Self::template_head());
        html.push_str("<script>const DATA=");
        html.push_str(&escape_json_for_script(&data_json));
        html.push_str(";const META=");
        html.push_str(&escape_json_for_script(&meta.to_string()));
        html.push_str(";</script>\n");
        html.push_str(Self::template_body());
        html.push_str(Self::template_script());
        html.push_str("</body>\n</html>\n");
        html
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_head() -> &'static str {
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Influencer recommendations</title>
<style>
:root{--bg:#0d0d11;--surface:#16161b;--surface2:#1e1e24;--border:#2a2a32;--text:#e4e4e7;--muted:#71717a;--strong:#22c55e;--consider:#eab308;--skip:#ef4444;--blue:#3b82f6;--radius:10px}
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Oxygen,sans-serif;background:var(--bg);color:var(--text);line-height:1.5;min-height:100vh}
a{color:var(--blue);text-decoration:none}
a:hover{text-decoration:underline}
.container{max-width:1280px;margin:0 auto;padding:2rem 1.5rem}
h1{font-size:1.5rem;font-weight:700}
.subtitle{color:var(--muted);font-size:.875rem;margin:.25rem 0 1.25rem}

/* ── Filters ── */
.filters{display:flex;gap:.5rem;flex-wrap:wrap;margin-bottom:.75rem}
.filters button{padding:.4rem .9rem;font-size:.8125rem;font-weight:600;border-radius:999px;cursor:pointer;border:1px solid var(--border);background:var(--surface);color:var(--muted);transition:all .15s}
.filters button:hover{color:var(--text);background:var(--surface2)}
.filters button.active{color:var(--text);border-color:var(--blue);background:var(--surface2)}
.filters button.active.strong-hire{border-color:var(--strong)}
.filters button.active.consider{border-color:var(--consider)}
.filters button.active.skip{border-color:var(--skip)}
.count{font-size:.8125rem;color:var(--muted);margin-bottom:1rem}

/* ── Cards ── */
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(360px,1fr));gap:1rem}
.card{background:var(--surface);border:1px solid var(--border);border-left:4px solid var(--border);border-radius:var(--radius);padding:1rem;display:flex;flex-direction:column;gap:.5rem}
.card.card-strong-hire{border-left-color:var(--strong)}
.card.card-consider{border-left-color:var(--consider)}
.card.card-skip{border-left-color:var(--skip)}
.card.hidden{display:none}
.card-header{display:flex;align-items:center;gap:.5rem;flex-wrap:wrap}
.badge{font-size:.6875rem;font-weight:700;padding:.15rem .5rem;border-radius:4px;text-transform:uppercase;white-space:nowrap}
.badge-strong-hire{background:rgba(34,197,94,.15);color:var(--strong)}
.badge-consider{background:rgba(234,179,8,.12);color:var(--consider)}
.badge-skip{background:rgba(239,68,68,.15);color:var(--skip)}
.profile-link{font-weight:600}
.name{color:var(--muted);font-size:.8125rem;overflow:hidden;text-overflow:ellipsis;white-space:nowrap}
.card-metrics{display:flex;gap:1rem;font-size:.875rem;font-variant-numeric:tabular-nums}
.card-extra{font-size:.75rem;color:var(--muted)}
.reason{font-size:.8125rem;font-style:italic;color:var(--text)}
.tweet-embeds{display:flex;flex-direction:column;gap:.5rem}
.tweet-fallback{background:var(--surface2);border-radius:6px;padding:.5rem .75rem}
.tweet-text{font-size:.8125rem;white-space:pre-wrap;word-break:break-word}
.empty{text-align:center;padding:3rem 1rem;color:var(--muted);font-size:.875rem}
</style>
</head>
<body>
"##
    }

    fn template_body() -> &'static str {
        r##"<div class="container">
  <h1>Influencer recommendations</h1>
  <p class="subtitle" id="subtitle"></p>
  <div class="filters" id="filters">
    <button type="button" class="filter-btn active" data-filter="all">All</button>
    <button type="button" class="filter-btn" data-filter="Strong hire">Strong hire</button>
    <button type="button" class="filter-btn" data-filter="Consider">Consider</button>
    <button type="button" class="filter-btn" data-filter="Skip">Skip</button>
  </div>
  <p class="count" id="count"></p>
  <div class="grid" id="grid"></div>
</div>
"##
    }

    fn template_script() -> &'static str {
        r##"<script>
(function(){
"use strict";

/* ── helpers ── */
const $=s=>document.querySelector(s);
const $$=s=>[...document.querySelectorAll(s)];
const esc=s=>{const d=document.createElement('div');d.textContent=s==null?'':String(s);return d.innerHTML.replace(/"/g,'&quot;')};

/* ── cards ── */
function renderTweet(t){
  if(t.url) return `<div class="tweet-embed-wrap"><blockquote class="twitter-tweet" data-dnt="true"><a href="${esc(t.url)}"></a></blockquote></div>`;
  return `<div class="tweet-fallback"><p class="tweet-text">${esc(t.text)}</p></div>`;
}

function renderCard(c){
  const extra=[];
  if(c.joined) extra.push(`<span title="Account creation date">${esc(c.joined)}</span>`);
  if(c.listed) extra.push(`<span title="List count">Listed ${esc(c.listed)}</span>`);
  if(c.ratio&&c.ratio!=='—') extra.push(`<span title="Followers / Following">F/Following ${esc(c.ratio)}</span>`);
  extra.push(`<span title="Matching tweets in search">Matching tweets ${c.tweetsFound}</span>`);
  extra.push(`<span title="Likes / RTs / Replies on those">♥ ${c.likes} · RT ${c.retweets} · ↩ ${c.replies}</span>`);
  return `<article class="card card-${esc(c.slug)}" data-recommendation="${esc(c.recommendation)}">
  <div class="card-header">
    <span class="badge badge-${esc(c.slug)}">${esc(c.recommendation)}</span>
    <a href="${esc(c.profileUrl)}" target="_blank" rel="noopener" class="profile-link">@${esc(c.username)}</a>
    <span class="name">${esc(c.name)}</span>
  </div>
  <div class="card-metrics">
    <span title="Followers">Followers ${esc(c.followers)}</span>
    <span title="Total engagements">Engagement ${c.engagement}</span>
    <span title="Engagement rate">ER ${esc(c.erPct)}</span>
  </div>
  <div class="card-extra">${extra.join(' · ')}</div>
  <p class="reason">${esc(c.reason)}</p>
  <div class="tweet-embeds">${c.tweets.map(renderTweet).join('')}</div>
</article>`;
}

function render(){
  $('#subtitle').textContent=META.subtitle;
  $('#count').textContent='Total: '+META.total;
  const grid=$('#grid');
  if(!DATA.length){
    grid.innerHTML='<div class="empty">No authors to show.</div>';
    return;
  }
  grid.innerHTML=DATA.map(renderCard).join('');
}

/* ── filters ── */
$$('.filter-btn').forEach(btn=>{
  btn.onclick=()=>{
    $$('.filter-btn').forEach(b=>b.classList.remove('active','strong-hire','consider','skip'));
    btn.classList.add('active');
    const filter=btn.dataset.filter;
    if(filter!=='all') btn.classList.add(filter.toLowerCase().replace(' ','-'));
    $$('.card').forEach(card=>{
      card.classList.toggle('hidden',filter!=='all'&&card.dataset.recommendation!==filter);
    });
  };
});

/* ── init ── */
render();
const w=document.createElement('script');
w.async=true;w.src='https://platform.twitter.com/widgets.js';w.charset='utf-8';
document.body.appendChild(w);

})();
</script>
"##
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js_card(row: &RecommendationRow, profile_base_url: &str) -> JsCard {
    let tweets = row
        .samples()
        .into_iter()
        .filter_map(|(text, _, url)| {
            let url = url.trim();
            if is_web_url(url) {
                return Some(JsTweet {
                    url: Some(url.to_string()),
                    text: None,
                });
            }
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            let mut shown = truncate_chars(text, MAX_SAMPLE_CHARS).to_string();
            if shown.len() < text.len() {
                shown.push('…');
            }
            Some(JsTweet {
                url: None,
                text: Some(shown),
            })
        })
        .collect();

    let profile_url = if is_web_url(&row.profile_url) {
        row.profile_url.clone()
    } else {
        profile_url(profile_base_url, &row.username)
    };

    JsCard {
        recommendation: row.recommendation.as_str().to_string(),
        slug: row.recommendation.slug().to_string(),
        username: row.username.clone(),
        name: row.name.clone(),
        profile_url,
        followers: format_num(row.followers_count),
        engagement: row.total_engagement,
        er_pct: format_percent(row.engagement_rate),
        reason: row.recommendation_reason.clone(),
        joined: format_joined(&row.created_at),
        listed: if row.listed_count > 0 {
            format_num(row.listed_count)
        } else {
            String::new()
        },
        ratio: format_ratio(row.followers_count, row.following_count),
        tweets_found: row.tweets_found,
        likes: row.total_likes,
        retweets: row.total_retweets,
        replies: row.total_replies,
        tweets,
    }
}

/// Only http(s) links are rendered as hrefs
fn is_web_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Compact count: 950, 12.3K, 1.5M
pub fn format_num(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// "Joined Dec 2013" from an ISO 8601 timestamp, empty when unparsable
pub fn format_joined(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at.trim())
        .map(|dt| dt.format("Joined %b %Y").to_string())
        .unwrap_or_default()
}

/// Followers per following: "250x", "2.5x", "1:4", or "—" when undefined
pub fn format_ratio(followers: u64, following: u64) -> String {
    if following == 0 || followers == 0 {
        return "—".to_string();
    }
    let ratio = followers as f64 / following as f64;
    if ratio >= 10.0 {
        format!("{:.0}x", ratio)
    } else if ratio >= 1.0 {
        format!("{:.1}x", ratio)
    } else {
        format!("1:{:.0}", 1.0 / ratio)
    }
}
