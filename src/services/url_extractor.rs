//! URL 提取服务 - 业务能力层
//!
//! 从 sitemap / HTML / 任意文本中提取候选 URL。
//! 三级匹配按优先级互斥，先命中者生效，结果不合并：
//! 1. `<loc>…</loc>`（sitemap；标签忽略大小写，内容可以跨行）
//! 2. `href="http(s)://…"`
//! 3. 宽松匹配任意 `http(s)://` 片段

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc>(.*?)</loc>").expect("loc pattern"));

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*"(https?://[^"]*)""#).expect("href pattern")
});

static LOOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("loose url pattern"));

/// 命中的匹配层级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    SitemapLoc,
    HrefAttribute,
    Loose,
    None,
}

/// 提取 URL
///
/// # 参数
/// - `raw_text`: 原始文本
/// - `filter_keywords`: 关键词过滤（为空时不过滤，多个关键词之间为"或"）
///
/// # 返回
/// 去重后的 URL 列表，保持首次出现的顺序
pub fn extract_urls(raw_text: &str, filter_keywords: &[String]) -> Vec<String> {
    let (tier, candidates) = match_candidates(raw_text);
    debug!("URL 提取命中层级: {:?}, 候选数量: {}", tier, candidates.len());

    let keywords: Vec<String> = filter_keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .filter(|url| matches_keywords(url, &keywords))
        .filter(|url| seen.insert(*url))
        .map(ToOwned::to_owned)
        .collect()
}

/// 按优先级找到第一个有结果的层级
fn match_candidates(raw_text: &str) -> (MatchTier, Vec<&str>) {
    let locs: Vec<&str> = capture_group(&LOC_RE, raw_text);
    if !locs.is_empty() {
        return (MatchTier::SitemapLoc, locs);
    }

    let hrefs: Vec<&str> = capture_group(&HREF_RE, raw_text);
    if !hrefs.is_empty() {
        return (MatchTier::HrefAttribute, hrefs);
    }

    let loose: Vec<&str> = LOOSE_RE.find_iter(raw_text).map(|m| m.as_str()).collect();
    if !loose.is_empty() {
        return (MatchTier::Loose, loose);
    }

    (MatchTier::None, Vec::new())
}

fn capture_group<'t>(re: &Regex, text: &'t str) -> Vec<&'t str> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

fn matches_keywords(url: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let lowered = url.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k.as_str()))
}

/// 将逗号或换行分隔的关键词字符串拆成列表
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
