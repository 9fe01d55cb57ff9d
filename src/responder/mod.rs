//! Turn pipeline: one input in, one reply out
//!
//! Routing order per turn:
//! 1. observe the input (sentiment, name, definitions, mood, log)
//! 2. remote model, when configured
//! 3. correction learning
//! 4. name recall, then mood report
//! 5. greeting
//! 6. sentiment support
//! 7. arithmetic
//! 8. learned corrections
//! 9. knowledge base
//! 10. web search
//! 11. context recall
//! 12. default reply
//!
//! Every collaborator failure degrades to the next local step; a turn always
//! produces a reply.

pub mod math;
pub mod replies;

use chrono::{Local, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::{Config, Personality};
use crate::errors::Result;
use crate::matcher::{normalize, FollowUpCategory, IntentMatcher, KnowledgeBase};
use crate::memory::types::SEARCH_MARKER;
use crate::memory::{
    extract_definition, extract_name, parse_correction, Correction, MemoryLimits, SessionState,
};
use crate::remote::{self, TextGenerator, WebSearch};
use crate::sentiment::{classify, Sentiment};

use math::Expression;

/// Words that open a conversation
const GREETINGS: &[&str] = &["halo", "hallo", "hai", "hi", "hello"];

const NAME_QUESTIONS: &[&str] = &["siapa nama saya", "nama saya siapa"];
const MOOD_WORDS: &[&str] = &["mood", "suasana hati"];
const RECALL_WORDS: &[&str] = &["tadi", "sebelum", "ingat"];
const SEARCH_WORDS: &[&str] = &["cari", "search"];

/// Which step of the pipeline produced a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    Remote,
    CorrectionLearned,
    NameRecall,
    Mood,
    Greeting,
    Support,
    Math,
    Learned,
    Knowledge { topic: String },
    Search,
    ContextRecall,
    Default,
}

/// The reply to one turn
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// Sentiment of the input that produced this reply
    pub sentiment: Sentiment,
    pub source: ReplySource,
}

impl Reply {
    fn new(text: String, sentiment: Sentiment, source: ReplySource) -> Self {
        Self { text, sentiment, source }
    }
}

/// Composes matcher, session memory and remote collaborators into turns
pub struct Responder {
    matcher: IntentMatcher,
    limits: MemoryLimits,
    rng: StdRng,
    generator: Option<Box<dyn TextGenerator>>,
    search: Option<Box<dyn WebSearch>>,
    personality: Personality,
    remote_timeout: Duration,
    search_timeout: Duration,
}

impl Responder {
    /// Local-only responder with entropy-seeded randomness
    pub fn new(matcher: IntentMatcher) -> Self {
        Self {
            matcher,
            limits: MemoryLimits::default(),
            rng: StdRng::from_entropy(),
            generator: None,
            search: None,
            personality: Personality::default(),
            remote_timeout: Duration::from_secs(15),
            search_timeout: Duration::from_secs(5),
        }
    }

    /// Responder wired from configuration
    pub fn from_config(config: &Config, knowledge: KnowledgeBase) -> Result<Self> {
        let matcher = IntentMatcher::new(knowledge, config.matcher.threshold);
        let mut responder = Self::new(matcher)
            .with_limits(MemoryLimits::from(&config.memory))
            .with_personality(config.remote.personality)
            .with_timeouts(
                Duration::from_secs(config.remote.timeout_secs),
                Duration::from_secs(config.search.timeout_secs),
            );
        responder.generator = remote::generator_from_config(&config.remote)?;
        responder.search = remote::search_from_config(&config.search)?;
        Ok(responder)
    }

    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_search(mut self, search: Box<dyn WebSearch>) -> Self {
        self.search = Some(search);
        self
    }

    /// Drop both remote collaborators
    pub fn offline(mut self) -> Self {
        self.generator = None;
        self.search = None;
        self
    }

    /// Deterministic follow-ups and default replies
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_limits(mut self, limits: MemoryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn with_timeouts(mut self, remote: Duration, search: Duration) -> Self {
        self.remote_timeout = remote;
        self.search_timeout = search;
        self
    }

    pub fn matcher(&self) -> &IntentMatcher {
        &self.matcher
    }

    pub fn limits(&self) -> &MemoryLimits {
        &self.limits
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    /// Run one turn against the session state
    pub async fn respond(&mut self, state: &mut SessionState, input: &str) -> Reply {
        let lower = normalize(input);
        let sentiment = classify(input);
        let learned = self.observe(state, input, sentiment);

        if let Some(text) = self.ask_remote(input).await {
            debug!(route = "remote", "reply");
            let text = personalize_if(state, text, sentiment == Sentiment::Question);
            return Reply::new(text, sentiment, ReplySource::Remote);
        }

        if let Some(correction) = learned {
            let text = replies::correction_learned(&correction.question, &correction.answer);
            let text = personalize_if(state, text, true);
            return Reply::new(text, sentiment, ReplySource::CorrectionLearned);
        }

        if let Some(name) = state.profile.name.as_deref() {
            if contains_any(&lower, NAME_QUESTIONS) {
                debug!(route = "name_recall", "reply");
                return Reply::new(replies::name_recall(name), sentiment, ReplySource::NameRecall);
            }
        }

        if contains_any(&lower, MOOD_WORDS) {
            debug!(route = "mood", "reply");
            return Reply::new(replies::mood_report(&state.profile), sentiment, ReplySource::Mood);
        }

        if is_greeting(&lower) {
            debug!(route = "greeting", "reply");
            let text = replies::greeting(state.profile.name.as_deref(), state.profile.average_mood);
            return Reply::new(text, sentiment, ReplySource::Greeting);
        }

        if sentiment == Sentiment::Negative && contains_any(&lower, &["sedih", "marah"]) {
            debug!(route = "support", "reply");
            let text = personalize_if(state, replies::NEGATIVE_SUPPORT.to_string(), true);
            return Reply::new(text, sentiment, ReplySource::Support);
        }

        if sentiment == Sentiment::Positive && contains_any(&lower, &["menang", "senang"]) {
            debug!(route = "support", "reply");
            return Reply::new(replies::POSITIVE_SUPPORT.to_string(), sentiment, ReplySource::Support);
        }

        if let Some(expression) = Expression::find(&lower) {
            debug!(route = "math", %expression, "reply");
            return Reply::new(replies::math(&expression.to_string()), sentiment, ReplySource::Math);
        }

        let threshold = self.matcher.threshold();
        if let Some(hit) = state.corrections.lookup(&lower, threshold) {
            debug!(route = "learned", question = hit.question, score = hit.score, "reply");
            let follow_up = FollowUpCategory::from_topic(hit.question).pick(&mut self.rng);
            let text = replies::learned_answer(hit.answer, follow_up);
            return Reply::new(text, sentiment, ReplySource::Learned);
        }

        if let Some(found) = self.matcher.match_input(&lower) {
            debug!(route = "knowledge", topic = %found.entry.topic, keyword = found.keyword, score = found.score, "reply");
            let follow_up = found.entry.follow_up_category().pick(&mut self.rng);
            let text = replies::knowledge_answer(&found.entry.render(Local::now()), follow_up);
            let topic = found.entry.topic.clone();
            let text = personalize_if(state, text, sentiment == Sentiment::Question);
            return Reply::new(text, sentiment, ReplySource::Knowledge { topic });
        }

        let wants_search = (sentiment == Sentiment::Question
            && !self.matcher.knowledge().mentions_topic(&lower))
            || contains_any(&lower, SEARCH_WORDS);
        if wants_search {
            if let Some(reply) = self.web_search(state, &lower, sentiment).await {
                return reply;
            }
        }

        if !state.log.is_empty() && contains_any(&lower, RECALL_WORDS) {
            debug!(route = "context_recall", "reply");
            let text = replies::context_recall(state.recent_log(replies::RECALL_WINDOW));
            return Reply::new(text, sentiment, ReplySource::ContextRecall);
        }

        let index = self.rng.gen_range(0..replies::DEFAULT_REPLY_COUNT);
        debug!(route = "default", index, "reply");
        let text = personalize_if(state, replies::default_reply(index, input), true);
        Reply::new(text, sentiment, ReplySource::Default)
    }

    /// Learn what the input reveals and record it
    ///
    /// Corrections are stored here, before any remote call, and returned for
    /// the acknowledgement step.
    fn observe(&self, state: &mut SessionState, input: &str, sentiment: Sentiment) -> Option<Correction> {
        let correction = parse_correction(input);
        if let Some(correction) = &correction {
            info!(question = %correction.question, "learned correction");
            state.corrections.learn(correction.clone());
        }
        if let Some(name) = extract_name(input) {
            if state.profile.name.as_deref() != Some(name.as_str()) {
                info!(%name, "learned user name");
                state.profile.name = Some(name);
            }
        }
        if let Some((subject, definition)) = extract_definition(input) {
            if state.contexts.learn(subject.clone(), definition) {
                debug!(%subject, "learned context");
            }
        }
        state.record_turn(input, sentiment, &self.limits);
        correction
    }

    async fn ask_remote(&self, input: &str) -> Option<String> {
        let generator = self.generator.as_ref()?;
        let prompt = remote::build_prompt(self.personality, input);

        match timeout(self.remote_timeout, generator.complete(&prompt)).await {
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                debug!(generator = generator.name(), error = %e, "remote model failed; answering locally");
                None
            }
            Err(_) => {
                debug!(
                    generator = generator.name(),
                    timeout_ms = self.remote_timeout.as_millis() as u64,
                    "remote model timed out; answering locally"
                );
                None
            }
        }
    }

    async fn web_search(&mut self, state: &mut SessionState, lower: &str, sentiment: Sentiment) -> Option<Reply> {
        let search = self.search.as_ref()?;
        let term = lower.replacen("cari ", "", 1).replacen("search ", "", 1);

        let hit = match timeout(self.search_timeout, search.search(&term)).await {
            Ok(Ok(Some(hit))) => hit,
            Ok(Ok(None)) => {
                debug!(%term, "search found nothing");
                return None;
            }
            Ok(Err(e)) => {
                debug!(%term, error = %e, "search failed");
                return None;
            }
            Err(_) => {
                debug!(%term, "search timed out");
                return None;
            }
        };

        debug!(route = "search", source = %hit.source, "reply");
        state.push_log(format!("{}{}]", SEARCH_MARKER, term), sentiment, Utc::now(), &self.limits);
        let follow_up = FollowUpCategory::Default.pick(&mut self.rng);
        Some(Reply::new(replies::search_result(&hit, follow_up), sentiment, ReplySource::Search))
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn is_greeting(lower: &str) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| GREETINGS.contains(&word))
}

fn personalize_if(state: &SessionState, text: String, condition: bool) -> String {
    match state.profile.name.as_deref() {
        Some(name) if condition => replies::personalize(name, &text),
        _ => text,
    }
}
