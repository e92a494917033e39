use serde::{Deserialize, Serialize};

use crate::model::{BattleFormat, Face, Mode, Parity, Winner};

pub const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    numbers: [&'static str; 6],
}

pub static LANGUAGES: [Language; 7] = [
    Language { code: "en-US", name: "English", numbers: ["one", "two", "three", "four", "five", "six"] },
    Language { code: "es-ES", name: "Spanish", numbers: ["uno", "dos", "tres", "cuatro", "cinco", "seis"] },
    Language { code: "fr-FR", name: "French", numbers: ["un", "deux", "trois", "quatre", "cinq", "six"] },
    Language { code: "de-DE", name: "German", numbers: ["eins", "zwei", "drei", "vier", "fünf", "sechs"] },
    Language { code: "it-IT", name: "Italian", numbers: ["uno", "due", "tre", "quattro", "cinque", "sei"] },
    Language { code: "pt-BR", name: "Portuguese", numbers: ["um", "dois", "três", "quatro", "cinco", "seis"] },
    Language { code: "nl-NL", name: "Dutch", numbers: ["één", "twee", "drie", "vier", "vijf", "zes"] },
];

pub fn language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Number word for a face. Unknown languages speak English; values outside
/// 1..=6 come back as digits.
pub fn number_in_language(n: Face, code: &str) -> String {
    let lang = language(code).unwrap_or(&LANGUAGES[0]);
    match n {
        1..=6 => lang.numbers[(n - 1) as usize].to_string(),
        _ => n.to_string(),
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UiLanguage {
    #[default]
    Es,
    En,
}

pub struct Phrases {
    pub normal: &'static str,
    pub odd_or_even: &'static str,
    pub battle: &'static str,
    pub select_numbers: &'static str,
    pub best_of_3: &'static str,
    pub best_of_5: &'static str,
    pub odd: &'static str,
    pub even: &'static str,
    pub is_the_winner: &'static str,
    pub wins_the_battle: &'static str,
    pub wins_with: &'static str,
}

static ES: Phrases = Phrases {
    normal: "Normal",
    odd_or_even: "Par o Impar",
    battle: "Batalla",
    select_numbers: "Seleccionar Números",
    best_of_3: "Mejor de 3",
    best_of_5: "Mejor de 5",
    odd: "Impar",
    even: "Par",
    is_the_winner: "¡es el ganador!",
    wins_the_battle: "¡gana la batalla!",
    wins_with: "gana con",
};

static EN: Phrases = Phrases {
    normal: "Normal",
    odd_or_even: "Odd or Even",
    battle: "Battle",
    select_numbers: "Select Numbers",
    best_of_3: "Best of 3",
    best_of_5: "Best of 5",
    odd: "Odd",
    even: "Even",
    is_the_winner: "is the winner!",
    wins_the_battle: "wins the battle!",
    wins_with: "wins with",
};

pub fn phrases(lang: UiLanguage) -> &'static Phrases {
    match lang {
        UiLanguage::Es => &ES,
        UiLanguage::En => &EN,
    }
}

pub fn parity_label(parity: Parity, lang: UiLanguage) -> &'static str {
    let p = phrases(lang);
    match parity {
        Parity::Odd => p.odd,
        Parity::Even => p.even,
    }
}

pub fn mode_label(mode: Mode, lang: UiLanguage) -> &'static str {
    let p = phrases(lang);
    match mode {
        Mode::Normal => p.normal,
        Mode::OddEven => p.odd_or_even,
        Mode::Battle => p.battle,
        Mode::SelectNumbers => p.select_numbers,
    }
}

pub fn format_label(format: BattleFormat, lang: UiLanguage) -> &'static str {
    let p = phrases(lang);
    match format {
        BattleFormat::BestOf3 => p.best_of_3,
        BattleFormat::BestOf5 => p.best_of_5,
    }
}

pub fn roll_announcement(face: Face, speech: &str) -> String {
    number_in_language(face, speech)
}

/// Text spoken once a round is decided. Named battle winners get their own
/// "<name> wins with <number>" line after the battle line.
pub fn winner_announcement(winner: Winner, winner_names: &[&str], speech: &str, ui: UiLanguage) -> String {
    let p = phrases(ui);
    match winner {
        Winner::Parity(parity) => format!("{} {}", parity_label(parity, ui), p.is_the_winner),
        Winner::Face(face) => {
            let number = number_in_language(face, speech);
            let mut text = format!("{} {}", number, p.wins_the_battle);
            for name in winner_names {
                text.push_str(&format!(" {} {} {}", name, p.wins_with, number));
            }
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_words() {
        assert_eq!(number_in_language(5, "es-ES"), "cinco");
        assert_eq!(number_in_language(4, "de-DE"), "vier");
        assert_eq!(number_in_language(2, "xx-XX"), "two");
        assert_eq!(number_in_language(9, "en-US"), "9");
    }

    #[test]
    fn ui_language_fallback() {
        assert_eq!(UiLanguage::default(), UiLanguage::Es);
    }

    #[test]
    fn labels_follow_ui_language() {
        assert_eq!(mode_label(Mode::OddEven, UiLanguage::Es), "Par o Impar");
        assert_eq!(mode_label(Mode::SelectNumbers, UiLanguage::En), "Select Numbers");
        assert_eq!(format_label(BattleFormat::BestOf5, UiLanguage::Es), "Mejor de 5");
        assert_eq!(parity_label(Parity::Even, UiLanguage::En), "Even");
        assert_eq!(language("pt-BR").map(|l| l.name), Some("Portuguese"));
    }

    #[test]
    fn winner_texts() {
        let odd = winner_announcement(Winner::Parity(Parity::Odd), &[], "en-US", UiLanguage::En);
        assert_eq!(odd, "Odd is the winner!");
        let battle = winner_announcement(Winner::Face(5), &["Ana"], "es-ES", UiLanguage::Es);
        assert_eq!(battle, "cinco ¡gana la batalla! Ana gana con cinco");
    }
}
