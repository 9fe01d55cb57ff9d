//! Static knowledge base: keyword sets mapped to canned answers
//!
//! The table is immutable once loaded. Entries keep their definition order,
//! which the matcher uses as the tie-break between equal scores.

use crate::errors::{NovaError, Result};
use crate::matcher::followup::FollowUpCategory;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One row of the knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Stable topic identifier (e.g. "bitcoin", "premier_league")
    pub topic: String,
    /// Lowercase keywords; never empty
    pub keys: Vec<String>,
    /// Answer template; `{time}` and `{date}` are filled at reply time
    pub answer: String,
    /// Follow-up category override; derived from the topic when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FollowUpCategory>,
}

impl KnowledgeEntry {
    pub fn new(topic: &str, keys: &[&str], answer: &str) -> Self {
        Self {
            topic: topic.to_string(),
            keys: keys.iter().map(|k| k.to_lowercase()).collect(),
            answer: answer.to_string(),
            category: None,
        }
    }

    /// Follow-up category for this entry
    pub fn follow_up_category(&self) -> FollowUpCategory {
        self.category
            .unwrap_or_else(|| FollowUpCategory::from_topic(&self.topic))
    }

    /// Render the answer template at the given instant
    pub fn render(&self, now: DateTime<Local>) -> String {
        if !self.answer.contains('{') {
            return self.answer.clone();
        }
        self.answer
            .replace("{time}", &now.format("%H.%M.%S").to_string())
            .replace("{date}", &now.format("%-d/%-m/%Y").to_string())
    }
}

/// Immutable keyword table
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Build a knowledge base, rejecting entries with no usable keywords
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(entries.len());

        for mut entry in entries {
            entry.keys = entry
                .keys
                .iter()
                .map(|k| k.trim().to_lowercase())
                .collect();

            if entry.keys.is_empty() {
                return Err(NovaError::KnowledgeBase(format!(
                    "topic '{}' has no keywords",
                    entry.topic
                )));
            }
            if entry.keys.iter().any(|k| k.is_empty()) {
                return Err(NovaError::KnowledgeBase(format!(
                    "topic '{}' has an empty keyword",
                    entry.topic
                )));
            }

            let mut seen = Vec::with_capacity(entry.keys.len());
            entry.keys.retain(|k| {
                if seen.contains(k) {
                    false
                } else {
                    seen.push(k.clone());
                    true
                }
            });

            normalized.push(entry);
        }

        Ok(Self { entries: normalized })
    }

    /// Load a knowledge base from a JSON array of entries
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let entries: Vec<KnowledgeEntry> = serde_json::from_str(&json)?;
        Self::new(entries)
    }

    /// The built-in table shipped with the assistant
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(topic, keys, answer)| KnowledgeEntry::new(topic, keys, answer))
            .collect();
        Self { entries }
    }

    /// Entries in definition order
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// True if the input names any topic id outright ("bali united", "ai")
    pub fn mentions_topic(&self, input: &str) -> bool {
        self.entries
            .iter()
            .any(|e| input.contains(&e.topic.replace('_', " ")))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

type BuiltinEntry = (&'static str, &'static [&'static str], &'static str);

const BUILTIN: &[BuiltinEntry] = &[
    // Sports, local
    ("persija", &["persija", "jakarta", "timnas"], "⚽ Persija Jakarta: Klub sepak bola Jakarta. Rival utama: Persib Bandung. Stadion: Gelora Bung Karno. Penggemarnya loyal & passionate. Prestasi: Juara Liga Indonesia berkali-kali. Julukan: Tim Jaya."),
    ("persib", &["persib", "bandung"], "⚽ Persib Bandung: Klub legendaris Bandung. Rival: Persija Jakarta. Stadion: Si Jalak Harupat. Fans: Bobotoh (sangat suportif). Tradisi kuat."),
    ("psm", &["psm", "makassar"], "⚽ PSM Makassar: Klub dominan Sulawesi Selatan. Stadion: Andi Mattalatta. Fanbase besar di Makassar."),
    ("bali_united", &["bali united", "bali"], "⚽ Bali United: Klub dari Bali, rising force. Stadion: Kapten I Wayan Dipta. Tujuan: Juara Liga Indonesia & AFC Cup."),
    ("timnas", &["timnas", "indonesia", "national team", "garuda"], "🇮🇩 Timnas Indonesia: Tim sepak bola nasional Indonesia. Target: Kualifikasi Piala Dunia. Dukungan fans sangat besar."),
    // Sports, international
    ("messi", &["messi", "lionel", "argentina"], "⚽ Lionel Messi: Pemain legendaris Argentina. Klub: Inter Miami (MLS). Prestasi: 8 Ballon d'Or, Juara Piala Dunia 2022. Skill: Dribbling, passing, vision."),
    ("ronaldo", &["ronaldo", "cristiano", "portugal"], "⚽ Cristiano Ronaldo: Bintang Portugal. Klub: Man Utd, Real Madrid, Juventus, Al Nassr. Prestasi: 5 Ballon d'Or, Juara Piala Eropa."),
    ("neymar", &["neymar", "brezil", "brazil"], "⚽ Neymar Jr: Bintang Brazil. Prestasi: Olympic gold. Skill: Dribbling, flair, creativity."),
    ("kylian_mbappe", &["mbappe", "kylian", "france"], "🏃 Kylian Mbappé: Bintang Prancis. Klub: Real Madrid (2024). Prestasi: Juara Piala Dunia 2018. Skill: Speed, finishing."),
    ("premier_league", &["premier league", "english football", "epl"], "⚽ Premier League: Liga sepak bola Inggris, paling kompetitif & komersial. Klub: Man City, Man Utd, Liverpool, Arsenal, Chelsea."),
    ("la_liga", &["la liga", "spanish football", "liga spanyol"], "⚽ La Liga Spanyol: Kompetisi top Eropa. Klub: Real Madrid, Barcelona, Atletico Madrid. Gaya: Teknis & beautiful football."),
    ("serie_a", &["serie a", "italian football", "italia"], "⚽ Serie A Italia: Liga yang taktis dan defensif. Klub: Juventus, Inter Milan, AC Milan, AS Roma."),
    ("bundesliga", &["bundesliga", "german football", "jerman"], "⚽ Bundesliga Jerman: Gaya menyerang & fisik. Klub: Bayern Munich, Borussia Dortmund. Atmosfer stadion fantastis."),
    ("ligue_1", &["ligue 1", "french football", "prancis"], "⚽ Ligue 1 Prancis: Klub: Paris Saint-Germain, Marseille, Monaco. Talent pool besar."),
    ("nba", &["nba", "basketball", "america"], "🏀 NBA: Liga bola basket terbesar dunia. Bintang: LeBron James, Stephen Curry, Luka Doncic."),
    ("lakers", &["lakers", "los angeles", "basketball"], "🏀 LA Lakers: Tim NBA legendaris dari Los Angeles. Prestasi: 17 gelar juara."),
    ("warriors", &["warriors", "golden state", "basketball"], "🏀 Golden State Warriors: Tim NBA dari Bay Area. Era dominasi 2015-2019. Pemain kunci: Stephen Curry."),
    ("tennis", &["tennis", "wimbledon", "grand slam"], "🎾 Tennis: 4 Grand Slam (Australian, French, Wimbledon, US Open). Legenda: Federer, Nadal, Djokovic. Sekarang: Sinner, Alcaraz."),
    ("f1", &["f1", "formula 1", "racing", "balap"], "🏎️ Formula 1: Olahraga balap mobil tertinggi. Tim: Ferrari, Mercedes, Red Bull. Musim panjang dengan 20+ balapan."),
    ("moto_gp", &["motogp", "moto gp", "motorcycle"], "🏍️ MotoGP: Balap motor tertinggi. Legenda: Marc Márquez, Valentino Rossi."),
    // Tech & AI
    ("ai", &["ai", "artificial intelligence"], "🤖 AI: Kemampuan mesin meniru kecerdasan manusia. Aplikasi: Chatbot, pengenalan wajah, kendaraan otonom, diagnosis medis. Teknologi: Neural Networks, Deep Learning, NLP, Transformer."),
    ("chatgpt", &["chatgpt", "openai", "gpt"], "💬 ChatGPT: Model bahasa dari OpenAI. Kemampuan: Percakapan natural, coding, menulis, analisis."),
    ("gemini", &["gemini", "google", "bard"], "🔮 Google Gemini: Asisten AI dari Google, sebelumnya Bard. Multi-modal (teks, gambar, kode)."),
    ("claude", &["claude", "anthropic"], "🧠 Claude: Asisten AI dari Anthropic. Fokus: Penalaran cermat, keamanan, akurasi."),
    ("neural_network", &["neural network", "deep learning"], "🧠 Neural Networks: Model komputasi terinspirasi neuron biologis. Struktur: Layer input, hidden, output. Training: Backpropagation, gradient descent."),
    // General knowledge
    ("einstein", &["einstein", "relativity"], "👨‍🔬 Albert Einstein (1879-1955): Fisikawan teoritis. Teori relativitas, efek fotolistrik. E=mc². Nobel 1921."),
    ("python", &["python", "coding", "programming"], "🐍 Python: Bahasa pemrograman (1991, Guido van Rossum). Guna: AI/ML, Data Science, Web, Automation. Sintaks bersih & mudah dibaca."),
    ("bitcoin", &["bitcoin", "cryptocurrency", "crypto"], "₿ Bitcoin: Cryptocurrency pertama (2009, Satoshi Nakamoto). Berbasis blockchain, terdesentralisasi. Supply maksimal 21 juta."),
    ("indonesia", &["indonesia", "nusantara"], "🇮🇩 Indonesia: Negara kepulauan terbesar dunia. 270+ juta penduduk, 700+ bahasa. Merdeka 17 Agustus 1945. Dasar negara: Pancasila."),
    ("jakarta", &["jakarta", "ibukota"], "🌆 Jakarta: Ibukota Indonesia. Populasi metropolitan 30+ juta. Pusat ekonomi, bisnis, pemerintahan. Landmark: Monas, Kota Tua."),
    ("sejarah", &["sejarah", "history", "proklamasi"], "📜 Sejarah Indonesia: Proklamasi Kemerdekaan 17 Agustus 1945 oleh Soekarno-Hatta. Pancasila sebagai dasar negara."),
    // Time
    ("jam", &["jam", "waktu", "tanggal"], "⏰ Sekarang pukul {time} tanggal {date}"),
];
