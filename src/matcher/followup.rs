//! Topic-keyed follow-up prompts appended to knowledge answers

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Follow-up prompt family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpCategory {
    Sports,
    Ai,
    Tech,
    Crypto,
    Indonesia,
    Location,
    History,
    Default,
}

impl FollowUpCategory {
    /// Derive a category from a topic id (or a learned question)
    pub fn from_topic(topic: &str) -> Self {
        let topic = topic.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| topic.contains(n));

        if has(&["sports", "football", "basketball"]) {
            FollowUpCategory::Sports
        } else if has(&["ai", "neural"]) {
            FollowUpCategory::Ai
        } else if has(&["bitcoin", "crypto"]) {
            FollowUpCategory::Crypto
        } else if has(&["indonesia", "jakarta"]) {
            FollowUpCategory::Location
        } else if has(&["history", "sejarah"]) {
            FollowUpCategory::History
        } else {
            FollowUpCategory::Default
        }
    }

    /// All prompts for this category
    pub fn prompts(&self) -> &'static [&'static str] {
        match self {
            FollowUpCategory::Sports => &[
                "Siapa pemain terbaiknya?",
                "Prestasi terbaru?",
                "Jadwal pertandingan?",
                "Pemain favorit?",
                "Analisis pertandingan apa?",
            ],
            FollowUpCategory::Ai => &[
                "Bedanya AI & ML?",
                "Neural network gimana?",
                "Aplikasi AI apa lagi?",
                "Gimana train AI?",
                "AI masa depan?",
                "Rekomendasinya?",
            ],
            FollowUpCategory::Tech => &[
                "Teknologi baru apa?",
                "Update terbaru?",
                "Bedanya versi lama?",
                "Bagaimana cara pakai?",
            ],
            FollowUpCategory::Crypto => &[
                "Investasi bagus?",
                "Harganya sekarang?",
                "Mining gimana?",
                "Risiko apa?",
                "Masa depan crypto?",
            ],
            FollowUpCategory::Indonesia => &[
                "Budaya lain?",
                "Makanan tradisional?",
                "Sejarah lebih dalam?",
                "Destinasi wisata?",
                "Bahasa daerah?",
            ],
            FollowUpCategory::Location => &[
                "Populasi berapa?",
                "Landmark apa?",
                "Transportasi gimana?",
                "Kuliner lokal?",
                "Sejarah lokasi?",
            ],
            FollowUpCategory::History => &[
                "Kapan terjadi?",
                "Siapa tokohnya?",
                "Dampaknya apa?",
                "Timeline detail?",
                "Cerita menarik lain?",
            ],
            FollowUpCategory::Default => &[
                "Ada yang mau diketahui lebih?",
                "Pertanyaan lain?",
                "Cerita lebih detail?",
                "Topik baru?",
                "Ada yang bingung?",
            ],
        }
    }

    /// Pick one prompt uniformly at random
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.prompts()
            .choose(rng)
            .copied()
            .unwrap_or("Pertanyaan lain?")
    }
}
