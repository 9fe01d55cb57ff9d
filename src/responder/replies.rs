//! Reply templates

use crate::memory::{ConversationEntry, SessionProfile};
use crate::remote::{SearchHit, SearchSource};
use crate::sentiment::Sentiment;

/// Log entries shown by a context recall
pub const RECALL_WINDOW: usize = 8;

/// Characters kept per recalled entry
const RECALL_CHARS: usize = 40;

/// Mood samples shown in the trend line
const TREND_WINDOW: usize = 5;

pub const NEGATIVE_SUPPORT: &str =
    "😢 Saya deteksi Anda sedang **SEDIH/MARAH**. Saya di sini untuk dengarkan. Cerita saja apa yang terjadi. 💙";

pub const POSITIVE_SUPPORT: &str =
    "😊 Energi positif Anda menginspirasi! 🎉 Mari lanjutkan percakapan menyenangkan ini.";

/// Number of default replies
pub const DEFAULT_REPLY_COUNT: usize = 4;

/// Prefix a reply with the user's name: `"Budi, halo..."`
pub fn personalize(name: &str, text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}, {}{}", name, first.to_lowercase(), chars.as_str()),
        None => format!("{}, ", name),
    }
}

pub fn correction_learned(question: &str, answer: &str) -> String {
    format!(
        "🧠 PEMBELAJARAN TERCATAT!\n✓ Q: \"{}\"\n✓ A: {}\n\nAku ingat selamanya!",
        question, answer
    )
}

pub fn name_recall(name: &str) -> String {
    format!("💾 Nama Anda adalah **{}**! 😊", name)
}

pub fn mood_report(profile: &SessionProfile) -> String {
    let mut text = format!("😊 Average mood Anda: **{}**", profile.average_mood);
    let recent = profile.recent_moods(TREND_WINDOW);
    if !recent.is_empty() {
        let trend: Vec<String> = recent.iter().map(|m| m.sentiment.initial().to_string()).collect();
        text.push_str("\n\nTren: ");
        text.push_str(&trend.join(" → "));
    }
    text
}

pub fn greeting(name: Option<&str>, average_mood: Sentiment) -> String {
    let mut text = String::from("👋 Halo!");
    if let Some(name) = name {
        text.push_str(&format!(" {}!", name));
    }
    if average_mood == Sentiment::Negative {
        text.push_str(" Mood Anda belakangan sedih. Ada yang bisa saya bantu? 💙");
    } else {
        text.push_str(" Ada yang bisa saya bantu?");
    }
    text
}

pub fn math(result: &str) -> String {
    format!("🧮 {}", result)
}

pub fn learned_answer(answer: &str, follow_up: &str) -> String {
    format!("📚 [INGATAN]\n{}\n\n💡 {}", answer, follow_up)
}

pub fn knowledge_answer(answer: &str, follow_up: &str) -> String {
    format!("{}\n\n💡 {}", answer, follow_up)
}

pub fn search_result(hit: &SearchHit, follow_up: &str) -> String {
    let heading = match hit.source {
        SearchSource::Wikipedia => "🌐 **HASIL WIKIPEDIA**",
        SearchSource::DuckDuckGo => "🔍 **HASIL WEB**",
    };
    format!("{}:\n\n{}\n\n💡 {}", heading, hit.summary, follow_up)
}

/// Recent user lines, skipping bookkeeping markers
pub fn context_recall(recent: &[ConversationEntry]) -> String {
    let mut text = String::from("💾 Riwayat chat:\n");
    let lines = recent.iter().filter(|entry| !entry.is_marker());
    for (i, entry) in lines.enumerate() {
        let shown: String = entry.text.chars().take(RECALL_CHARS).collect();
        let ellipsis = if entry.text.chars().count() > RECALL_CHARS { "..." } else { "" };
        text.push_str(&format!("\n{}. {}{}", i + 1, shown, ellipsis));
    }
    text.push_str("\n\nMau lanjutkan topik mana?");
    text
}

/// Default reply number `index` (taken modulo the reply count)
pub fn default_reply(index: usize, input: &str) -> String {
    match index % DEFAULT_REPLY_COUNT {
        0 => {
            let quoted: String = input.chars().take(20).collect();
            format!("Menarik: \"{}\". Cerita lebih detail?", quoted)
        }
        1 => "Saya mengerti. Ada lagi yang bisa bantu?".to_string(),
        2 => "Catatan diterima. Saya terus belajar! 📚".to_string(),
        _ => "Perspektif bagus. Topik lain?".to_string(),
    }
}
