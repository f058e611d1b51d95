//! Static HTML Exporter - renders a page or quiz record into one
//! self-contained HTML document: inline CSS, inline JS, no runtime
//! dependency on this server. The quiz document embeds the serialized
//! quiz plus a JS transliteration of the scoring engine in
//! `content/scoring.rs`; the two must stay answer-for-answer identical.
//!
//! Rendering is a pure function of the record. The only permitted
//! non-determinism is the current year in the footer.

use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use super::blocks::{Block, BlockBody, BlockData, PageRecord, TextAlign};
use super::quiz::{Quiz, QuizLayout};

/// Fallback accent when a theme identifier is not in the lookup table.
pub const DEFAULT_THEME_COLOR: &str = "#6366f1";

/// Bounded theme-identifier table. Unrecognized identifiers fall back
/// to [`DEFAULT_THEME_COLOR`] rather than failing.
const THEME_COLORS: &[(&str, &str)] = &[
    ("default", DEFAULT_THEME_COLOR),
    ("ocean", "#0ea5e9"),
    ("forest", "#10b981"),
    ("sunset", "#f97316"),
    ("rose", "#f43f5e"),
    ("mono", "#111827"),
];

pub fn theme_color(theme: &str) -> &'static str {
    THEME_COLORS
        .iter()
        .find(|(name, _)| *name == theme)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_THEME_COLOR)
}

/// Escape user text for interpolation into markup.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape serialized JSON for embedding inside a `<script>` block.
/// `<` becomes `\u003c` so user text containing `</script>` cannot
/// terminate the data island early.
pub fn escape_json_for_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}

lazy_static! {
    /// The common YouTube URL shapes: watch?v=, youtu.be/, embed/, v/,
    /// u/#/ - all resolve to an 11-character video id.
    static ref YOUTUBE_ID: Regex = Regex::new(
        r"(?:youtu\.be/|youtube\.com/(?:watch\?v=|watch\?.+&v=|embed/|v/|user/[^/]+/#/)|/u/\w/)([A-Za-z0-9_-]{11})"
    )
    .unwrap();

    /// Accent colors the style block accepts: a hex code or a bare CSS
    /// color keyword. Anything else would reach the stylesheet as raw
    /// CSS text.
    static ref ACCENT_COLOR: Regex = Regex::new(r"^(?:#[0-9a-fA-F]{3,8}|[a-zA-Z]+)$").unwrap();
}

/// Extract the 11-character video id, or `None` when the URL does not
/// match any documented shape.
pub fn youtube_video_id(url: &str) -> Option<String> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

// ============================================================================
// Profile / business page export
// ============================================================================

/// Render a page record into one standalone HTML document. Every block
/// variant from the Block Model renders to semantically equivalent
/// static markup; unknown blocks render nothing.
pub fn generate_profile_html(page: &PageRecord) -> String {
    let accent = theme_color(&page.settings.theme);
    let mut body = String::with_capacity(8 * 1024);
    for block in &page.content {
        render_block(block, &mut body);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<main class="page">
{body}</main>
<footer class="page-footer">&copy; {year} {title}</footer>
<script>{lead_js}</script>
</body>
</html>
"#,
        title = escape_html(&page.slug),
        css = page_css(accent),
        body = body,
        year = Utc::now().year(),
        lead_js = LEAD_FORM_JS,
    )
}

fn render_block(block: &Block, out: &mut String) {
    let parsed;
    let data = match &block.body {
        BlockBody::Known(data) => data,
        // Migration carries id-bearing blocks verbatim; the typed parse
        // happens here. Shapes that still match no known variant render
        // as nothing, never fail.
        BlockBody::Unknown { kind, data } => {
            let tagged = serde_json::json!({ "type": kind, "data": data });
            match serde_json::from_value::<BlockData>(tagged) {
                Ok(block_data) => {
                    parsed = block_data;
                    &parsed
                }
                Err(_) => return,
            }
        }
    };
    match data {
        BlockData::Header(h) => {
            out.push_str("<section class=\"block header\">");
            if !h.avatar.is_empty() {
                out.push_str(&format!(
                    "<img class=\"avatar\" src=\"{}\" alt=\"{}\">",
                    escape_html(&h.avatar),
                    escape_html(&h.name)
                ));
            }
            out.push_str(&format!(
                "<h1>{}</h1><p class=\"subtitle\">{}</p></section>\n",
                escape_html(&h.name),
                escape_html(&h.title)
            ));
        }
        BlockData::TextCard(t) => {
            let align = match t.align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
            };
            out.push_str(&format!("<section class=\"block card align-{}\">", align));
            if !t.title.is_empty() {
                out.push_str(&format!("<h2>{}</h2>", escape_html(&t.title)));
            }
            // Literal newlines in stored text become line breaks.
            out.push_str(&format!(
                "<p>{}</p></section>\n",
                escape_html(&t.text).replace('\n', "<br>")
            ));
        }
        BlockData::Image(i) => {
            out.push_str(&format!(
                "<figure class=\"block\"><img src=\"{}\" alt=\"{}\">",
                escape_html(&i.url),
                escape_html(i.caption.as_deref().unwrap_or(""))
            ));
            if let Some(caption) = &i.caption {
                out.push_str(&format!("<figcaption>{}</figcaption>", escape_html(caption)));
            }
            out.push_str("</figure>\n");
        }
        BlockData::Youtube(y) => match youtube_video_id(&y.url) {
            Some(id) => out.push_str(&format!(
                "<section class=\"block video\"><iframe src=\"https://www.youtube.com/embed/{}\" \
                 title=\"YouTube video\" frameborder=\"0\" allowfullscreen></iframe></section>\n",
                id
            )),
            None => out.push_str(
                "<section class=\"block video video-invalid\">Invalid video URL</section>\n",
            ),
        },
        BlockData::Links(l) => {
            out.push_str("<section class=\"block links\">");
            for link in &l.links {
                out.push_str(&format!(
                    "<a class=\"link link-{}\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
                    escape_html(&link.style),
                    escape_html(&link.url),
                    escape_html(&link.label)
                ));
            }
            out.push_str("</section>\n");
        }
        BlockData::Kindle(k) => {
            out.push_str("<section class=\"block card kindle\">");
            if !k.image_url.is_empty() {
                out.push_str(&format!(
                    "<img class=\"cover\" src=\"{}\" alt=\"{}\">",
                    escape_html(&k.image_url),
                    escape_html(&k.title)
                ));
            }
            out.push_str(&format!(
                "<h2>{}</h2><p>{}</p>\
                 <a class=\"button\" href=\"https://www.amazon.co.jp/dp/{}\" target=\"_blank\" rel=\"noopener\">Amazon</a>\
                 </section>\n",
                escape_html(&k.title),
                escape_html(&k.description),
                escape_html(&k.asin)
            ));
        }
        BlockData::LeadForm(f) => {
            out.push_str(&format!(
                "<section class=\"block card\"><h2>{}</h2>\
                 <form class=\"lead-form\"><input type=\"email\" name=\"email\" placeholder=\"you@example.com\" required>\
                 <button class=\"button\" type=\"submit\">{}</button>\
                 <p class=\"lead-thanks\" hidden>Thanks! We&#39;ll be in touch.</p></form></section>\n",
                escape_html(&f.title),
                escape_html(&f.button_text)
            ));
        }
        BlockData::LineCard(c) => {
            out.push_str(&format!(
                "<section class=\"block card line-card\"><h2>{}</h2><p>{}</p>\
                 <a class=\"button button-line\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></section>\n",
                escape_html(&c.title),
                escape_html(&c.description),
                escape_html(&c.url),
                escape_html(&c.button_text)
            ));
        }
        BlockData::Faq(f) => {
            out.push_str("<section class=\"block faq\">");
            for item in &f.items {
                out.push_str(&format!(
                    "<details><summary>{}</summary><p>{}</p></details>",
                    escape_html(&item.question),
                    escape_html(&item.answer)
                ));
            }
            out.push_str("</section>\n");
        }
        BlockData::Pricing(p) => {
            out.push_str("<section class=\"block pricing\">");
            for plan in &p.plans {
                out.push_str(&format!(
                    "<div class=\"plan{}\">",
                    if plan.is_recommended { " recommended" } else { "" }
                ));
                if plan.is_recommended {
                    out.push_str("<span class=\"badge\">Recommended</span>");
                }
                out.push_str(&format!(
                    "<h3>{}</h3><p class=\"price\">{}</p><ul>",
                    escape_html(&plan.title),
                    escape_html(&plan.price)
                ));
                for feature in &plan.features {
                    out.push_str(&format!("<li>{}</li>", escape_html(feature)));
                }
                out.push_str("</ul></div>");
            }
            out.push_str("</section>\n");
        }
        BlockData::Testimonial(t) => {
            out.push_str("<section class=\"block testimonials\">");
            for item in &t.items {
                out.push_str("<blockquote class=\"testimonial\">");
                if let Some(image_url) = &item.image_url {
                    out.push_str(&format!(
                        "<img class=\"avatar small\" src=\"{}\" alt=\"{}\">",
                        escape_html(image_url),
                        escape_html(&item.name)
                    ));
                }
                out.push_str(&format!(
                    "<p>{}</p><cite>{} <span class=\"role\">{}</span></cite></blockquote>",
                    escape_html(&item.comment),
                    escape_html(&item.name),
                    escape_html(&item.role)
                ));
            }
            out.push_str("</section>\n");
        }
    }
}

// ============================================================================
// Quiz export
// ============================================================================

/// Render a quiz into one standalone, offline-runnable HTML document.
/// The embedded player reproduces the scoring semantics of
/// `content/scoring.rs` for all three modes and both layouts.
pub fn generate_quiz_html(quiz: &Quiz) -> String {
    let accent = match quiz.color.trim() {
        c if ACCENT_COLOR.is_match(c) => c,
        _ => DEFAULT_THEME_COLOR,
    };
    let layout = match quiz.layout {
        QuizLayout::Card => "card",
        QuizLayout::Chat => "chat",
    };
    let data = serde_json::to_string(quiz).unwrap_or_else(|_| "null".to_string());

    let hero_image = match &quiz.image_url {
        Some(url) if !url.is_empty() => format!(
            "<img class=\"hero-image\" src=\"{}\" alt=\"{}\">",
            escape_html(url),
            escape_html(&quiz.title)
        ),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<main class="quiz layout-{layout}">
<header id="intro" class="quiz-hero">
{hero_image}<h1>{title}</h1>
<p>{description}</p>
<button id="start" class="button">Start</button>
</header>
<div id="player" hidden></div>
</main>
<footer class="page-footer">&copy; {year} {title}</footer>
<script>var QUIZ_DATA = {data};</script>
<script>{player}</script>
</body>
</html>
"#,
        title = escape_html(&quiz.title),
        description = escape_html(&quiz.description),
        css = quiz_css(accent),
        layout = layout,
        hero_image = hero_image,
        year = Utc::now().year(),
        data = escape_json_for_script(&data),
        player = PLAYER_JS,
    )
}

fn page_css(accent: &str) -> String {
    format!(
        ":root{{--accent:{accent}}}{}",
        SHARED_CSS
    )
}

fn quiz_css(accent: &str) -> String {
    format!(":root{{--accent:{accent}}}{}{}", SHARED_CSS, QUIZ_CSS)
}

/// Web-safe font stack, no external stylesheets: the document must
/// render with no network at all.
const SHARED_CSS: &str = "\
*{box-sizing:border-box;margin:0}\
body{font-family:'Hiragino Sans','Helvetica Neue',Arial,sans-serif;background:#f8fafc;color:#1e293b;line-height:1.6}\
.page,.quiz{max-width:640px;margin:0 auto;padding:24px 16px}\
.block{margin:0 0 20px}\
.card{background:#fff;border-radius:12px;padding:20px;box-shadow:0 1px 3px rgba(0,0,0,.08)}\
.align-center{text-align:center}\
.header{text-align:center;padding:24px 0}\
.avatar{width:96px;height:96px;border-radius:50%;object-fit:cover}\
.avatar.small{width:40px;height:40px}\
.subtitle{color:#64748b}\
figure img{width:100%;border-radius:12px}\
figcaption{color:#64748b;font-size:.85rem;text-align:center}\
.video iframe{width:100%;aspect-ratio:16/9;border-radius:12px}\
.video-invalid{background:#fee2e2;color:#b91c1c;text-align:center;padding:24px;border-radius:12px}\
.links{display:flex;flex-direction:column;gap:10px}\
.link{display:block;text-align:center;padding:14px;border-radius:10px;text-decoration:none;\
background:#fff;color:var(--accent);border:1px solid var(--accent)}\
.link-primary{background:var(--accent);color:#fff}\
.button{display:inline-block;padding:12px 24px;border:0;border-radius:10px;background:var(--accent);\
color:#fff;text-decoration:none;font-size:1rem;cursor:pointer}\
.button-line{background:#06c755}\
.kindle .cover{width:120px;border-radius:6px}\
.lead-form input{width:100%;padding:12px;margin:10px 0;border:1px solid #cbd5e1;border-radius:10px}\
.faq details{background:#fff;border-radius:10px;padding:12px 16px;margin-bottom:8px}\
.faq summary{cursor:pointer;font-weight:600}\
.pricing{display:flex;gap:12px;flex-wrap:wrap}\
.plan{flex:1 1 160px;background:#fff;border-radius:12px;padding:18px;border:1px solid #e2e8f0;position:relative}\
.plan.recommended{border-color:var(--accent)}\
.badge{position:absolute;top:-10px;right:12px;background:var(--accent);color:#fff;\
font-size:.7rem;padding:2px 8px;border-radius:999px}\
.price{font-size:1.4rem;font-weight:700}\
.plan ul{padding-left:18px;font-size:.9rem;color:#475569}\
.testimonial{background:#fff;border-radius:12px;padding:16px;margin-bottom:10px}\
.testimonial cite{display:block;margin-top:8px;color:#64748b;font-style:normal;font-size:.9rem}\
.page-footer{text-align:center;color:#94a3b8;font-size:.8rem;padding:24px 0}";

const QUIZ_CSS: &str = "\
.quiz-hero{text-align:center;padding:32px 0}\
.hero-image{width:100%;border-radius:12px;margin-bottom:16px}\
.quiz-hero p{color:#64748b;margin:12px 0 20px}\
.progress{font-size:.85rem;color:#64748b;margin-bottom:8px}\
.question{background:#fff;border-radius:12px;padding:20px;margin-bottom:16px}\
.option{display:block;width:100%;text-align:left;padding:14px;margin-bottom:10px;\
border:1px solid #cbd5e1;border-radius:10px;background:#fff;font-size:1rem;cursor:pointer}\
.option:hover{border-color:var(--accent)}\
.layout-chat .chat-log{display:flex;flex-direction:column;gap:10px;margin-bottom:16px}\
.layout-chat .bubble{max-width:85%;padding:12px 16px;border-radius:16px;background:#fff}\
.layout-chat .bubble.me{align-self:flex-end;background:var(--accent);color:#fff}\
.result{background:#fff;border-radius:12px;padding:24px;text-align:center}\
.result h2{margin-bottom:12px}\
.result p{color:#475569;white-space:pre-wrap}\
.result .button{margin-top:16px}\
.result img.qr{width:160px;margin-top:16px}";

/// Hand-written transliteration of `content/scoring.rs`. Any change to
/// the Rust engine must be mirrored here.
const PLAYER_JS: &str = r##"(function () {
  "use strict";
  var quiz = QUIZ_DATA;
  var TAGS = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];
  var step = 0;
  var scores = {};
  TAGS.forEach(function (t) { scores[t] = 0; });
  var correctCount = 0;
  var chat = document.querySelector("main").className.indexOf("layout-chat") !== -1;

  var intro = document.getElementById("intro");
  var player = document.getElementById("player");
  var chatLog = null;

  function el(tag, className, text) {
    var node = document.createElement(tag);
    if (className) node.className = className;
    if (text !== undefined) node.textContent = text;
    return node;
  }

  function points(v) {
    var n = Number(v);
    return Number.isFinite(n) ? Math.trunc(n) : 0;
  }

  function submitAnswer(i) {
    var question = quiz.questions[step];
    var option = question && question.options ? question.options[i] : null;
    if (option) {
      if (chat) {
        chatLog.appendChild(el("div", "bubble me", option.label));
      }
      if (!quiz.mode || quiz.mode === "type") {
        TAGS.forEach(function (t) {
          if (option.score && t in option.score) scores[t] += points(option.score[t]);
        });
      } else if (quiz.mode === "test") {
        if (option.score && points(option.score.A) === 1) correctCount += 1;
      }
    }
    step += 1;
    if (step >= quiz.questions.length) showResult(); else showQuestion();
  }

  function pickResult() {
    var results = quiz.results || [];
    if (!results.length) return null;
    if (quiz.mode === "test") {
      var total = quiz.questions.length;
      if (!total || correctCount >= total) return results[0];
      var ratio = correctCount / total;
      var idx = Math.floor((1 - ratio) * results.length);
      return results[Math.min(idx, results.length - 1)];
    }
    if (quiz.mode === "fortune") {
      return results[Math.floor(Math.random() * results.length)];
    }
    var best = TAGS[0];
    TAGS.forEach(function (t) { if (scores[t] > scores[best]) best = t; });
    for (var i = 0; i < results.length; i++) {
      if (results[i].type === best) return results[i];
    }
    return results[0];
  }

  function clearPlayer() {
    if (chat) {
      while (player.lastChild && player.lastChild !== chatLog) player.removeChild(player.lastChild);
    } else {
      player.textContent = "";
    }
  }

  function showQuestion() {
    clearPlayer();
    var question = quiz.questions[step];
    if (!question) { showResult(); return; }
    if (chat) {
      chatLog.appendChild(el("div", "bubble", question.text));
    } else {
      player.appendChild(el("div", "progress",
        "Q" + (step + 1) + " / " + quiz.questions.length));
      var box = el("div", "question");
      box.appendChild(el("h2", null, question.text));
      player.appendChild(box);
    }
    (question.options || []).forEach(function (option, i) {
      var button = el("button", "option", option.label);
      button.addEventListener("click", function () { submitAnswer(i); });
      player.appendChild(button);
    });
  }

  function showResult() {
    clearPlayer();
    var result = pickResult();
    var box = el("div", "result");
    if (!result) {
      box.appendChild(el("h2", null, "No result"));
      player.appendChild(box);
      return;
    }
    box.appendChild(el("h2", null, result.title));
    box.appendChild(el("p", null, result.description));
    if (result.link_url) {
      var link = el("a", "button", result.link_text || "Open");
      link.href = result.link_url;
      link.target = "_blank";
      link.rel = "noopener";
      box.appendChild(link);
    }
    if (result.line_url) {
      var line = el("a", "button button-line", result.line_text || "LINE");
      line.href = result.line_url;
      line.target = "_blank";
      line.rel = "noopener";
      box.appendChild(line);
    }
    if (result.qr_url) {
      var qr = el("img", "qr");
      qr.src = result.qr_url;
      qr.alt = result.qr_text || "";
      box.appendChild(qr);
      if (result.qr_text) box.appendChild(el("p", null, result.qr_text));
    }
    player.appendChild(box);
  }

  document.getElementById("start").addEventListener("click", function () {
    intro.hidden = true;
    player.hidden = false;
    if (chat) {
      chatLog = el("div", "chat-log");
      player.appendChild(chatLog);
    }
    if (!quiz.questions.length) { showResult(); return; }
    showQuestion();
  });
})();"##;

/// Lead-form handler for exported pages: no backend, just local
/// acknowledgement.
const LEAD_FORM_JS: &str = r#"document.querySelectorAll(".lead-form").forEach(function (form) {
  form.addEventListener("submit", function (e) {
    e.preventDefault();
    form.querySelector("input").disabled = true;
    form.querySelector("button").disabled = true;
    form.querySelector(".lead-thanks").hidden = false;
  });
});"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::blocks::*;
    use crate::content::quiz::*;

    fn page_with(blocks: Vec<Block>) -> PageRecord {
        PageRecord {
            slug: "my-page".to_string(),
            content: blocks,
            settings: PageSettings::default(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("<b>"), "&lt;b&gt;");
        assert_eq!(escape_html("\"q\"'s"), "&quot;q&quot;&#39;s");
    }

    #[test]
    fn test_theme_color_lookup_and_fallback() {
        assert_eq!(theme_color("ocean"), "#0ea5e9");
        assert_eq!(theme_color("default"), DEFAULT_THEME_COLOR);
        assert_eq!(theme_color("vaporwave"), DEFAULT_THEME_COLOR);
    }

    #[test]
    fn test_youtube_id_extraction_shapes() {
        let id = "dQw4w9WgXcQ";
        for url in [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=shared&v=dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://www.youtube.com/user/someone/#/dQw4w9WgXcQ",
        ] {
            assert_eq!(youtube_video_id(url).as_deref(), Some(id), "url: {}", url);
        }
        assert_eq!(youtube_video_id("https://vimeo.com/12345"), None);
        assert_eq!(youtube_video_id("https://youtu.be/short"), None);
    }

    #[test]
    fn test_invalid_youtube_url_renders_placeholder() {
        let page = page_with(vec![Block::known(
            "b1",
            BlockData::Youtube(YoutubeData {
                url: "https://vimeo.com/12345".to_string(),
            }),
        )]);
        let html = generate_profile_html(&page);
        assert!(html.contains("Invalid video URL"));
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn test_valid_youtube_url_renders_embed() {
        let page = page_with(vec![Block::known(
            "b1",
            BlockData::Youtube(YoutubeData {
                url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            }),
        )]);
        let html = generate_profile_html(&page);
        assert!(html.contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_user_text_is_escaped_in_markup() {
        let page = page_with(vec![Block::known(
            "b1",
            BlockData::TextCard(TextCardData {
                title: "<script>alert(1)</script>".to_string(),
                text: "line one\nline two".to_string(),
                align: TextAlign::Center,
            }),
        )]);
        let html = generate_profile_html(&page);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("line one<br>line two"));
        assert!(html.contains("align-center"));
    }

    #[test]
    fn test_unknown_block_renders_nothing() {
        let page = page_with(vec![Block {
            id: "b1".to_string(),
            body: BlockBody::Unknown {
                kind: "hologram".to_string(),
                data: serde_json::json!({ "x": 1 }),
            },
        }]);
        let html = generate_profile_html(&page);
        assert!(!html.contains("hologram"));
    }

    #[test]
    fn test_carried_block_with_known_kind_still_renders() {
        // Blocks carried verbatim through migration arrive with the
        // raw payload; the renderer typed-parses them here.
        let page = page_with(vec![Block {
            id: "b1".to_string(),
            body: BlockBody::Unknown {
                kind: "text_card".to_string(),
                data: serde_json::json!({ "text": "hello", "focalPoint": "top" }),
            },
        }]);
        let html = generate_profile_html(&page);
        assert!(html.contains("hello"));
    }

    #[test]
    fn test_every_known_variant_renders() {
        let page = page_with(vec![
            Block::known("b1", BlockData::Header(HeaderData {
                avatar: "https://example.com/a.png".into(),
                name: "Aki".into(),
                title: "Coach".into(),
            })),
            Block::known("b2", BlockData::TextCard(TextCardData::default())),
            Block::known("b3", BlockData::Image(ImageData {
                url: "https://example.com/i.png".into(),
                caption: Some("A photo".into()),
            })),
            Block::known("b4", BlockData::Youtube(YoutubeData {
                url: "https://youtu.be/dQw4w9WgXcQ".into(),
            })),
            Block::known("b5", BlockData::Links(LinksData {
                links: vec![LinkItem {
                    label: "Home".into(),
                    url: "https://example.com".into(),
                    style: "primary".into(),
                }],
            })),
            Block::known("b6", BlockData::Kindle(KindleData {
                asin: "B000000000".into(),
                ..KindleData::default()
            })),
            Block::known("b7", BlockData::LeadForm(LeadFormData {
                title: "Join".into(),
                button_text: "Sign up".into(),
            })),
            Block::known("b8", BlockData::LineCard(LineCardData::default())),
            Block::known("b9", BlockData::Faq(FaqData {
                items: vec![FaqItem {
                    id: "f1".into(),
                    question: "Why?".into(),
                    answer: "Because.".into(),
                }],
            })),
            Block::known("b10", BlockData::Pricing(PricingData {
                plans: vec![PricingPlan {
                    id: "p1".into(),
                    title: "Pro".into(),
                    price: "980".into(),
                    features: vec!["All features".into()],
                    is_recommended: true,
                }],
            })),
            Block::known("b11", BlockData::Testimonial(TestimonialData {
                items: vec![TestimonialItem {
                    id: "t1".into(),
                    name: "Mio".into(),
                    role: "Customer".into(),
                    comment: "Great".into(),
                    image_url: None,
                }],
            })),
        ]);
        let html = generate_profile_html(&page);
        for needle in [
            "Aki", "A photo", "youtube.com/embed", "Home", "amazon.co.jp/dp/B000000000",
            "Sign up", "Why?", "Recommended", "Great", "lead-form",
        ] {
            assert!(html.contains(needle), "missing: {}", needle);
        }
    }

    fn quiz_fixture() -> Quiz {
        serde_json::from_value(serde_json::json!({
            "slug": "my-quiz",
            "title": "Which type are you?",
            "description": "Answer honestly.",
            "mode": "type",
            "layout": "card",
            "color": "#ff5577",
            "questions": [
                { "text": "Q1", "options": [
                    { "label": "Yes", "score": { "A": 1 } },
                    { "label": "No", "score": { "B": 1 } }
                ]}
            ],
            "results": [
                { "type": "A", "title": "Type A", "description": "desc" },
                { "type": "B", "title": "Type B", "description": "desc" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_quiz_html_embeds_data_and_player() {
        let html = generate_quiz_html(&quiz_fixture());
        assert!(html.contains("var QUIZ_DATA = {"));
        assert!(html.contains("Which type are you?"));
        assert!(html.contains("function pickResult()"));
        assert!(html.contains("layout-card"));
        assert!(html.contains(":root{--accent:#ff5577}"));
    }

    #[test]
    fn test_quiz_title_cannot_terminate_data_script() {
        let mut quiz = quiz_fixture();
        quiz.title = "</script><script>alert(1)".to_string();
        let html = generate_quiz_html(&quiz);
        // The data island carries the escaped form only.
        assert!(html.contains("\\u003c/script"));
        assert!(!html.contains("</script><script>alert"));
    }

    #[test]
    fn test_quiz_html_is_deterministic() {
        let quiz = quiz_fixture();
        assert_eq!(generate_quiz_html(&quiz), generate_quiz_html(&quiz));
    }

    #[test]
    fn test_quiz_without_color_uses_default_theme() {
        let mut quiz = quiz_fixture();
        quiz.color = String::new();
        let html = generate_quiz_html(&quiz);
        assert!(html.contains(&format!(":root{{--accent:{}}}", DEFAULT_THEME_COLOR)));
    }

    #[test]
    fn test_quiz_color_outside_accent_pattern_falls_back() {
        let mut quiz = quiz_fixture();
        quiz.color = "red}body{display:none".to_string();
        let html = generate_quiz_html(&quiz);
        assert!(html.contains(&format!(":root{{--accent:{}}}", DEFAULT_THEME_COLOR)));
        assert!(!html.contains("display:none"));
    }

    #[test]
    fn test_quiz_color_keyword_is_accepted() {
        let mut quiz = quiz_fixture();
        quiz.color = "tomato".to_string();
        let html = generate_quiz_html(&quiz);
        assert!(html.contains(":root{--accent:tomato}"));
    }

    #[test]
    fn test_chat_layout_marks_document() {
        let mut quiz = quiz_fixture();
        quiz.layout = QuizLayout::Chat;
        assert!(generate_quiz_html(&quiz).contains("layout-chat"));
    }

    #[test]
    fn test_escape_json_for_script_inside_strings() {
        let json = serde_json::json!({ "title": "</script>" }).to_string();
        let escaped = escape_json_for_script(&json);
        assert!(!escaped.contains("</script>"));
        assert!(escaped.contains("\\u003c/script>"));
        // Still valid JSON after escaping.
        let back: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(back["title"], "</script>");
    }

    #[test]
    fn test_profile_html_is_self_contained() {
        let page = page_with(vec![]);
        let html = generate_profile_html(&page);
        assert!(!html.contains("src=\"http"), "no external scripts expected");
        assert!(html.contains("<style>"));
        assert!(html.contains("my-page"));
    }
}
