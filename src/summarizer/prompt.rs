//! Instruction prompt for the summary.
//!
//! The output format is enforced only through these instructions.

/// Title substituted when the caller supplies none
pub const DEFAULT_TITLE: &str = "(untitled)";

/// Upper bound for the closing synthesis, in characters of the target language
pub const MAX_CONCLUSION_CHARS: usize = 500;

/// Role the model is asked to take
pub const PERSONA: &str = "你是一位有15年經驗的資深SEO顧問";

/// Language every summary is written in
pub const TARGET_LANGUAGE: &str = "繁體中文";

/// Build the full prompt for `title` and `content`; the content goes last, verbatim.
pub fn build_prompt(title: &str, content: &str) -> String {
    format!(
        "{persona}，善於快速理解中英文內容、擅長梳理文章架構、提煉重點與總結精華。\n\
\n\
**無論下方內容是中文或英文，一律以「{language}」輸出條列摘要與結語。**\n\
\n\
【輸出格式】\n\
- 第一行為文章標題，格式固定為：{heading}\n\
1. 條列摘要：依照原文的邏輯結構分段，每段以 H2 或 H3 小標題（## 或 ###）標示，\
小標題下以「- 」開頭條列重點，層次分明、簡潔清楚。\n\
2. 結語總結：以不超過 {max_chars} 字寫出全文精髓，讓沒讀過原文的人也能迅速掌握核心觀點。\n\
\n\
【文章內容】：\n\
{content}\n",
        persona = PERSONA,
        language = TARGET_LANGUAGE,
        heading = title_heading(title),
        max_chars = MAX_CONCLUSION_CHARS,
        content = content,
    )
}

/// The literal heading line the model is told to start with
pub fn title_heading(title: &str) -> String {
    format!("# 文章標題：{title}")
}
