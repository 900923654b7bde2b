//! Keyword-pattern rule chain mapping a user utterance to a reply.

use anyhow::Result;
use regex::Regex;

use crate::knowledge::KnowledgeBase;

/// One entry in the rule chain. A rule without a pattern always matches.
struct Rule {
    intent: &'static str,
    pattern: Option<Regex>,
    reply: fn(&KnowledgeBase) -> String,
}

impl Rule {
    fn matches(&self, normalized: &str) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(normalized),
            None => true,
        }
    }
}

/// Maps utterances to replies by evaluating an ordered rule chain.
///
/// The chain is fixed at construction. Matching lowercases the utterance and
/// tests whole-word keyword patterns in declaration order; the first match
/// wins. Given the same utterance and knowledge base, the reply is always
/// identical.
pub struct Responder {
    rules: Vec<Rule>,
}

impl Responder {
    /// Compile the rule chain.
    ///
    /// Declaration order is the priority order. Overlapping keyword sets are
    /// resolved by whichever rule appears first, so the specific current-work
    /// patterns must stay ahead of the broader skills, projects, and contact
    /// rules.
    pub fn new() -> Result<Self> {
        let rules = vec![
            rule(
                "greeting",
                r"\b(hi|hello|hey|greetings|good morning|good afternoon|good evening)\b",
                greeting,
            )?,
            rule(
                "identity",
                r"\b(who are you|what is your name|your name|name)\b",
                identity,
            )?,
            rule(
                "about",
                r"\b(about|tell me about|who is|introduce|introduction)\b",
                about,
            )?,
            rule(
                "location",
                r"\b(where|location|city|based|live|from)\b",
                location,
            )?,
            rule(
                "education",
                r"\b(education|degree|college|university|study|studied|qualification)\b",
                education,
            )?,
            rule(
                "current-work",
                r"\b(current.*work|current.*job|current.*position|currently.*working|current.*company|present.*work|present.*job)\b",
                current_work,
            )?,
            rule(
                "skills",
                r"\b(skills|technologies|tech stack|programming|languages|expertise|proficient)\b",
                skills,
            )?,
            rule(
                "projects",
                r"\b(projects|project|work|portfolio|built|developed|created)\b",
                projects,
            )?,
            rule(
                "project-fraud",
                r"\b(fraud|fraudulent|transaction)\b",
                project_fraud,
            )?,
            rule(
                "project-heart",
                r"\b(heart|failure|detection)\b",
                project_heart,
            )?,
            rule(
                "project-bus",
                r"\b(bus|where is my bus|transport)\b",
                project_bus,
            )?,
            rule(
                "experience",
                r"\b(experience|internship|intern|worked|previous|past)\b",
                experience,
            )?,
            rule(
                "contact",
                r"\b(contact|email|reach|get in touch|connect|hire|collaborate)\b",
                contact,
            )?,
            rule(
                "social",
                r"\b(linkedin|github|portfolio|fiverr|freelancer|instagram|blog|social|links)\b",
                social,
            )?,
            rule(
                "awards",
                r"\b(award|achievement|recognition|accomplishment)\b",
                awards,
            )?,
            rule(
                "certifications",
                r"\b(certification|certificate|certified|course|training)\b",
                certifications,
            )?,
            rule(
                "freelance",
                r"\b(service|freelance|hire|work with|collaborate|help|assist)\b",
                freelance,
            )?,
            rule(
                "technologies",
                r"\b(python|javascript|react|node|mongodb|sql|machine learning|data science|power bi|tableau)\b",
                technologies,
            )?,
            // Unconditional fallback; the chain never falls through.
            Rule {
                intent: "fallback",
                pattern: None,
                reply: fallback,
            },
        ];

        Ok(Self { rules })
    }

    /// Name of the first rule matching the utterance.
    pub fn classify(&self, utterance: &str) -> &'static str {
        let normalized = utterance.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| rule.intent)
            .unwrap_or("fallback")
    }

    /// Produce the reply for one utterance.
    pub fn respond(&self, utterance: &str, kb: &KnowledgeBase) -> String {
        let normalized = utterance.to_lowercase();
        match self.rules.iter().find(|rule| rule.matches(&normalized)) {
            Some(rule) => (rule.reply)(kb),
            None => fallback(kb),
        }
    }
}

fn rule(
    intent: &'static str,
    pattern: &str,
    reply: fn(&KnowledgeBase) -> String,
) -> Result<Rule> {
    Ok(Rule {
        intent,
        pattern: Some(Regex::new(pattern)?),
        reply,
    })
}

/// Social URL for a platform, falling back to the contact email when the
/// profile has no entry for it.
fn link(kb: &KnowledgeBase, platform: &str) -> String {
    kb.social_url(platform).unwrap_or(&kb.email).to_string()
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn greeting(kb: &KnowledgeBase) -> String {
    format!(
        "Hello! I'm {}, an assistant representing {}. How can I help you today?",
        kb.bot_name, kb.owner
    )
}

fn identity(kb: &KnowledgeBase) -> String {
    format!(
        "I'm {}, an assistant representing {}. I'm here to answer questions about {}'s background, skills, projects, and experience.",
        kb.bot_name, kb.owner, kb.owner
    )
}

fn about(kb: &KnowledgeBase) -> String {
    format!(
        "{} is a {} based in {}, passionate about data science, machine learning, and building end-to-end products.",
        kb.owner, kb.role, kb.location
    )
}

fn location(kb: &KnowledgeBase) -> String {
    format!("{} is based in {}.", kb.owner, kb.location)
}

fn education(kb: &KnowledgeBase) -> String {
    format!("{}'s education: {}", kb.owner, kb.education)
}

fn current_work(kb: &KnowledgeBase) -> String {
    format!("Currently, {} is working as {}.", kb.owner, kb.current_work)
}

fn skills(kb: &KnowledgeBase) -> String {
    format!(
        "{} has expertise in: {}. That spans machine learning, data analysis, web development, and data visualization.",
        kb.owner,
        kb.skills.join(", ")
    )
}

fn projects(kb: &KnowledgeBase) -> String {
    format!(
        "{} has worked on several projects including: {}. You can find more on GitHub: {}",
        kb.owner,
        kb.projects.join(", "),
        link(kb, "github")
    )
}

fn project_fraud(_kb: &KnowledgeBase) -> String {
    "Fraudulent Transaction Prediction: proactively flags fraudulent payments in a dataset of 6.3 million transactions. The work covers data cleaning, model development, variable selection, and recommendations for tightening the payment infrastructure.".to_string()
}

fn project_heart(_kb: &KnowledgeBase) -> String {
    "Heart Failure Detection: a Scikit-learn classification model that detects heart failure with 92% accuracy.".to_string()
}

fn project_bus(_kb: &KnowledgeBase) -> String {
    "Where Is My Bus?: a real-time local bus locator and tracker offering live GPS updates, route management, and passenger assistance, built on the MERN stack. It won Best Student Paper at the 2023 Smart Mobility Symposium.".to_string()
}

fn experience(kb: &KnowledgeBase) -> String {
    format!(
        "{}'s experience so far:\n{}",
        kb.owner,
        numbered(&kb.experience)
    )
}

fn contact(kb: &KnowledgeBase) -> String {
    format!(
        "You can contact {} via email at {}. You can also connect on LinkedIn: {}, or hire directly via Fiverr: {} or Freelancer: {}",
        kb.owner,
        kb.email,
        link(kb, "linkedin"),
        link(kb, "fiverr"),
        link(kb, "freelancer")
    )
}

fn social(kb: &KnowledgeBase) -> String {
    let links = kb
        .social_links
        .iter()
        .map(|entry| format!("- {}: {}", entry.platform, entry.url))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Here are {}'s links:\n{}", kb.owner, links)
}

fn awards(kb: &KnowledgeBase) -> String {
    format!("{} has received:\n{}", kb.owner, numbered(&kb.awards))
}

fn certifications(kb: &KnowledgeBase) -> String {
    kb.certifications.clone()
}

fn freelance(kb: &KnowledgeBase) -> String {
    format!(
        "{} is currently exploring freelancing to help businesses turn raw data into decisions. You can hire directly via Fiverr: {} or Freelancer: {}, or write to {}",
        kb.owner,
        link(kb, "fiverr"),
        link(kb, "freelancer"),
        kb.email
    )
}

fn technologies(kb: &KnowledgeBase) -> String {
    format!(
        "{} works with {} day to day, along with data tooling such as Pandas, NumPy, and Scikit-learn.",
        kb.owner,
        kb.skills.join(", ")
    )
}

fn fallback(kb: &KnowledgeBase) -> String {
    format!(
        "I'm sorry, I don't have specific information about that. For detailed inquiries, please contact {} directly at {}.",
        kb.owner, kb.email
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Responder, KnowledgeBase) {
        (Responder::new().unwrap(), KnowledgeBase::builtin())
    }

    #[test]
    fn greetings_mention_the_bot_identity() {
        let (responder, kb) = setup();
        for input in ["hello", "Hey there", "good morning!"] {
            let reply = responder.respond(input, &kb);
            assert!(reply.contains(&kb.bot_name), "no identity in: {}", reply);
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let (responder, _) = setup();
        assert_eq!(responder.classify("HELLO"), "greeting");
        assert_eq!(responder.classify("WHERE are you BASED?"), "location");
    }

    #[test]
    fn keywords_only_match_whole_words() {
        let (responder, _) = setup();
        // "about" inside a larger word must not trigger the about rule.
        assert_eq!(responder.classify("anaboutism"), "fallback");
        // "transaction" inside "transactions" has no trailing boundary, but
        // "fraudulent" still matches as a whole word.
        assert_eq!(responder.classify("fraudulent charges"), "project-fraud");
    }

    #[test]
    fn location_reply_quotes_the_knowledge_base() {
        let (responder, kb) = setup();
        let reply = responder.respond("Where are you based?", &kb);
        assert!(reply.contains(&kb.location));
    }

    #[test]
    fn current_work_outranks_broader_rules() {
        let (responder, kb) = setup();
        assert_eq!(
            responder.classify("what do you currently work on"),
            "current-work"
        );
        let reply = responder.respond("what do you currently work on", &kb);
        assert!(reply.contains(&kb.current_work));
    }

    #[test]
    fn named_projects_rank_above_generic_lookups() {
        let (responder, _) = setup();
        assert_eq!(responder.classify("heart failure model?"), "project-heart");
        assert_eq!(responder.classify("the bus tracker"), "project-bus");
        // A generic projects keyword still wins over the named rules.
        assert_eq!(responder.classify("fraud project"), "projects");
    }

    #[test]
    fn unknown_input_returns_the_exact_fallback() {
        let (responder, kb) = setup();
        let reply = responder.respond("asdkjashdjkh", &kb);
        assert_eq!(reply, fallback(&kb));
        assert!(reply.contains(&kb.email));
    }

    #[test]
    fn respond_is_deterministic() {
        let (responder, kb) = setup();
        for input in ["hello", "skills?", "asdkjashdjkh"] {
            assert_eq!(responder.respond(input, &kb), responder.respond(input, &kb));
        }
    }

    #[test]
    fn every_intent_is_reachable() {
        let (responder, _) = setup();
        let probes = [
            ("hi", "greeting"),
            ("what is your name", "identity"),
            ("introduce yourself", "about"),
            ("which city", "location"),
            ("college degree", "education"),
            ("current position", "current-work"),
            ("tech stack", "skills"),
            ("portfolio", "projects"),
            ("fraudulent", "project-fraud"),
            ("heart failure", "project-heart"),
            ("bus route", "project-bus"),
            ("internship history", "experience"),
            ("how do i reach you", "contact"),
            ("linkedin and github", "social"),
            ("any award", "awards"),
            ("certified courses", "certifications"),
            ("freelance availability", "freelance"),
            ("do you know python", "technologies"),
            ("zzz qqq", "fallback"),
        ];
        for (input, expected) in probes {
            assert_eq!(responder.classify(input), expected, "input: {}", input);
        }
    }
}
