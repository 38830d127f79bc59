//! Locale definitions and per-locale language packs
//!
//! A [`LanguagePack`] bundles everything locale-specific in one place: the
//! platform locale code handed to the speech capabilities, the ordered intent
//! matcher table, the navigation-target and irrigation-action keyword tables,
//! and the localized strings shown when a capability fails. Adding a language
//! means adding one table entry here and nothing anywhere else.

use crate::action::NavTarget;
use crate::intent::IntentKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Supported assistant languages. Fixed for the duration of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    English,
    Hindi,
    Telugu,
}

impl Locale {
    /// BCP-47 code passed to the capture and playback capabilities.
    pub fn code(self) -> &'static str {
        match self {
            Locale::English => "en-US",
            Locale::Hindi => "hi-IN",
            Locale::Telugu => "te-IN",
        }
    }

    pub fn all() -> [Locale; 3] {
        [Locale::English, Locale::Hindi, Locale::Telugu]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Locale::English => "english",
            Locale::Hindi => "hindi",
            Locale::Telugu => "telugu",
        };
        f.write_str(name)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" | "en-us" => Ok(Locale::English),
            "hindi" | "hi" | "hi-in" => Ok(Locale::Hindi),
            "telugu" | "te" | "te-in" => Ok(Locale::Telugu),
            other => Err(format!("unknown locale: {other}")),
        }
    }
}

/// Localized strings surfaced to the user when a capability fails.
struct PackStrings {
    generation_fallback: &'static str,
    capture_failed: &'static str,
    voice_unsupported: &'static str,
    reply_instruction: &'static str,
}

/// Everything locale-specific: matcher tables and user-visible strings.
///
/// Matcher order is fixed per locale; [`crate::intent::parse`] evaluates the
/// table top to bottom and the first hit wins, so overlapping patterns resolve
/// deterministically.
pub struct LanguagePack {
    locale: Locale,
    matchers: Vec<(IntentKind, Regex)>,
    nav_targets: Vec<(NavTarget, Regex)>,
    irrigation_actions: Vec<(&'static str, Regex)>,
    strings: PackStrings,
}

impl LanguagePack {
    /// Look up the static pack for a locale.
    pub fn for_locale(locale: Locale) -> &'static LanguagePack {
        match locale {
            Locale::English => &PACKS[0],
            Locale::Hindi => &PACKS[1],
            Locale::Telugu => &PACKS[2],
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Ordered (kind, predicate) pairs; first match wins.
    pub fn matchers(&self) -> &[(IntentKind, Regex)] {
        &self.matchers
    }

    /// Resolve a navigation target from transcript keywords, if any.
    pub fn nav_target(&self, transcript: &str) -> Option<NavTarget> {
        self.nav_targets
            .iter()
            .find(|(_, re)| re.is_match(transcript))
            .map(|(target, _)| *target)
    }

    /// Resolve an irrigation action keyword; defaults to `status`.
    pub fn irrigation_action(&self, transcript: &str) -> &'static str {
        self.irrigation_actions
            .iter()
            .find(|(_, re)| re.is_match(transcript))
            .map(|(action, _)| *action)
            .unwrap_or("status")
    }

    /// Assistant message substituted when the dialogue backend fails.
    pub fn generation_fallback(&self) -> &'static str {
        self.strings.generation_fallback
    }

    /// Assistant message appended when speech capture fails.
    pub fn capture_failed(&self) -> &'static str {
        self.strings.capture_failed
    }

    /// Assistant message appended when voice input is unavailable.
    pub fn voice_unsupported(&self) -> &'static str {
        self.strings.voice_unsupported
    }

    /// Language instruction embedded in the dialogue backend prompt.
    pub fn reply_instruction(&self) -> &'static str {
        self.strings.reply_instruction
    }
}

fn matcher_table(patterns: [&str; 6]) -> Vec<(IntentKind, Regex)> {
    // Evaluation order mirrors the table order below; keep navigate last so
    // category keywords ("show me the market") beat the generic verbs.
    let kinds = [
        IntentKind::Weather,
        IntentKind::Irrigation,
        IntentKind::Crops,
        IntentKind::Market,
        IntentKind::Alerts,
        IntentKind::Navigate,
    ];
    kinds
        .into_iter()
        .zip(patterns)
        .map(|(kind, pat)| (kind, Regex::new(pat).expect("invalid intent pattern")))
        .collect()
}

fn nav_table(patterns: [&str; 7]) -> Vec<(NavTarget, Regex)> {
    let targets = [
        NavTarget::Dashboard,
        NavTarget::Profile,
        NavTarget::Irrigation,
        NavTarget::Crops,
        NavTarget::Market,
        NavTarget::Alerts,
        NavTarget::Sustainable,
    ];
    targets
        .into_iter()
        .zip(patterns)
        .map(|(target, pat)| (target, Regex::new(pat).expect("invalid nav pattern")))
        .collect()
}

fn irrigation_table(start: &str, stop: &str) -> Vec<(&'static str, Regex)> {
    vec![
        ("start", Regex::new(start).expect("invalid irrigation pattern")),
        ("stop", Regex::new(stop).expect("invalid irrigation pattern")),
    ]
}

static PACKS: LazyLock<[LanguagePack; 3]> = LazyLock::new(|| {
    [
        LanguagePack {
            locale: Locale::English,
            matchers: matcher_table([
                r"(?i)weather|temperature|humidity|rain",
                r"(?i)water|irrigate|irrigation|moisture",
                r"(?i)crop|plant|harvest|yield",
                r"(?i)price|market|sell|buy",
                r"(?i)alert|notification|warning",
                r"(?i)go to|open|show|display",
            ]),
            nav_targets: nav_table([
                r"(?i)dashboard|home",
                r"(?i)profile|farm",
                r"(?i)irrigation|water",
                r"(?i)crop|plant",
                r"(?i)market|price",
                r"(?i)alert|notification",
                r"(?i)sustainable|green",
            ]),
            irrigation_actions: irrigation_table(r"(?i)start|begin", r"(?i)stop|pause"),
            strings: PackStrings {
                generation_fallback: "I'm here to help with your farming needs. You can ask about weather, irrigation, crops, or market prices.",
                capture_failed: "Sorry, I couldn't understand that. Please try again.",
                voice_unsupported: "Voice recognition is not supported on this device.",
                reply_instruction: "Respond in English",
            },
        },
        LanguagePack {
            locale: Locale::Hindi,
            matchers: matcher_table([
                r"मौसम|तापमान|नमी|बारिश",
                r"पानी|सिंचाई|नमी",
                r"फसल|पौधा|कटाई|उत्पादन",
                r"कीमत|बाजार|बेचना|खरीदना",
                r"चेतावनी|सूचना|अलर्ट",
                r"जाओ|खोलो|दिखाओ",
            ]),
            nav_targets: nav_table([
                r"डैशबोर्ड|होम",
                r"प्रोफ़ाइल|खेत",
                r"सिंचाई|पानी",
                r"फसल|पौधा",
                r"बाजार|कीमत",
                r"चेतावनी|अलर्ट",
                r"टिकाऊ|हरित",
            ]),
            irrigation_actions: irrigation_table(r"शुरू|चालू", r"बंद|रोको"),
            strings: PackStrings {
                generation_fallback: "मैं आपकी खेती की जरूरतों में मदद करने के लिए यहाँ हूँ। आप मौसम, सिंचाई, फसलों या बाजार की कीमतों के बारे में पूछ सकते हैं।",
                capture_failed: "माफ करें, मैं समझ नहीं पाया। कृपया फिर से कोशिश करें।",
                voice_unsupported: "आपके डिवाइस पर वॉयस रिकग्निशन समर्थित नहीं है।",
                reply_instruction: "Respond in Hindi (Devanagari script)",
            },
        },
        LanguagePack {
            locale: Locale::Telugu,
            matchers: matcher_table([
                r"వాతావరణం|ఉష్ణోగ్రత|తేమ|వర్షం",
                r"నీరు|నీటిపారుదల|తేమ",
                r"పంట|మొక్క|కోత|దిగుబడి",
                r"ధర|మార్కెట్|అమ్మడం|కొనడం",
                r"హెచ్చరిక|నోటిఫికేషన్|అలర్ట్",
                r"వెళ్లు|తెరువు|చూపించు",
            ]),
            nav_targets: nav_table([
                r"డాష్‌బోర్డ్|హోమ్",
                r"ప్రొఫైల్|పొలం",
                r"నీటిపారుదల|నీరు",
                r"పంట|మొక్క",
                r"మార్కెట్|ధర",
                r"హెచ్చరిక|అలర్ట్",
                r"సుస్థిర|హరిత",
            ]),
            irrigation_actions: irrigation_table(r"ప్రారంభించు|మొదలు", r"ఆపు|నిలిపి"),
            strings: PackStrings {
                generation_fallback: "నేను మీ వ్యవసాయ అవసరాలతో సహాయం చేయడానికి ఇక్కడ ఉన్నాను. మీరు వాతావరణం, నీటిపారుదల, పంటలు లేదా మార్కెట్ ధరల గురించి అడగవచ్చు.",
                capture_failed: "క్షమించండి, నేను అర్థం చేసుకోలేకపోయాను. దయచేసి మళ్లీ ప్రయత్నించండి.",
                voice_unsupported: "మీ పరికరంలో వాయిస్ రికగ్నిషన్ మద్దతు లేదు.",
                reply_instruction: "Respond in Telugu script",
            },
        },
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_codes() {
        assert_eq!(Locale::English.code(), "en-US");
        assert_eq!(Locale::Hindi.code(), "hi-IN");
        assert_eq!(Locale::Telugu.code(), "te-IN");
    }

    #[test]
    fn locale_round_trips_through_str() {
        for locale in Locale::all() {
            assert_eq!(locale.to_string().parse::<Locale>().unwrap(), locale);
        }
        assert!("klingon".parse::<Locale>().is_err());
    }

    #[test]
    fn matcher_order_is_fixed() {
        for locale in Locale::all() {
            let kinds: Vec<IntentKind> = LanguagePack::for_locale(locale)
                .matchers()
                .iter()
                .map(|(kind, _)| *kind)
                .collect();
            assert_eq!(
                kinds,
                vec![
                    IntentKind::Weather,
                    IntentKind::Irrigation,
                    IntentKind::Crops,
                    IntentKind::Market,
                    IntentKind::Alerts,
                    IntentKind::Navigate,
                ]
            );
        }
    }

    #[test]
    fn nav_targets_resolve_per_locale() {
        let en = LanguagePack::for_locale(Locale::English);
        assert_eq!(en.nav_target("take me home"), Some(NavTarget::Dashboard));
        assert_eq!(en.nav_target("open the market page"), Some(NavTarget::Market));
        assert_eq!(en.nav_target("nothing relevant"), None);

        let hi = LanguagePack::for_locale(Locale::Hindi);
        assert_eq!(hi.nav_target("बाजार खोलो"), Some(NavTarget::Market));

        let te = LanguagePack::for_locale(Locale::Telugu);
        assert_eq!(te.nav_target("మార్కెట్ చూపించు"), Some(NavTarget::Market));
    }

    #[test]
    fn irrigation_action_defaults_to_status() {
        let en = LanguagePack::for_locale(Locale::English);
        assert_eq!(en.irrigation_action("start watering"), "start");
        assert_eq!(en.irrigation_action("pause the pump"), "stop");
        assert_eq!(en.irrigation_action("how is the soil"), "status");
    }

    #[test]
    fn fallback_strings_are_localized() {
        let mut seen = std::collections::HashSet::new();
        for locale in Locale::all() {
            let pack = LanguagePack::for_locale(locale);
            assert!(!pack.generation_fallback().is_empty());
            assert!(seen.insert(pack.generation_fallback()));
        }
    }
}
