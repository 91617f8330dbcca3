//! Human-readable rendering of pack state and fit results.
//!
//! Two languages are supported: English and Russian (the language the preset
//! catalog is written in).

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::{Aggregate, CatalogItem, FitOutcome, Item};

/// Output language for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ru" | "russian" => Ok(Language::Ru),
            other => Err(format!("unsupported language: {other} (expected en or ru)")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Ru => write!(f, "ru"),
        }
    }
}

/// Russian noun form for a count: `forms` = [one, few, many].
///
/// 11..=14 take "many"; otherwise the last digit decides.
pub fn russian_plural(count: usize, forms: [&'static str; 3]) -> &'static str {
    let last_digit = count % 10;
    let last_two = count % 100;
    if (11..=14).contains(&last_two) {
        forms[2]
    } else if last_digit == 1 {
        forms[0]
    } else if (2..=4).contains(&last_digit) {
        forms[1]
    } else {
        forms[2]
    }
}

/// "предмет" / "item" in the right form for `count`.
pub fn items_word(count: usize, language: Language) -> &'static str {
    match language {
        Language::Ru => russian_plural(count, ["предмет", "предмета", "предметов"]),
        Language::En if count == 1 => "item",
        Language::En => "items",
    }
}

fn kg(grams: i64) -> String {
    format!("{:.1}", grams as f64 / 1000.0)
}

/// The three summary lines shown after every change.
///
/// An empty pack renders nothing.
pub fn summary_lines(aggregate: &Aggregate, language: Language) -> Vec<String> {
    if aggregate.count == 0 {
        return Vec::new();
    }
    let max_weight = aggregate.max_weight as i64;
    let total_weight = aggregate.total_weight as i64;
    let count = aggregate.count;
    let word = items_word(count, language);

    match language {
        Language::Ru => vec![
            format!(
                "Максимальный вес: {} гр. ({} кг)     Максимальный объем: {} л",
                max_weight,
                kg(max_weight),
                aggregate.max_volume
            ),
            format!("В рюкзаке {count} {word}"),
            format!(
                "Занято: {} гр. ({} кг), осталось {} гр. ({} кг)     Занято: {:.1} л, осталось {:.1} л",
                total_weight,
                kg(total_weight),
                aggregate.remaining_weight,
                kg(aggregate.remaining_weight),
                aggregate.total_volume,
                aggregate.remaining_volume
            ),
        ],
        Language::En => vec![
            format!(
                "Max weight: {} g ({} kg)     Max volume: {} l",
                max_weight,
                kg(max_weight),
                aggregate.max_volume
            ),
            format!("Packed: {count} {word}"),
            format!(
                "Used: {} g ({} kg), left {} g ({} kg)     Used: {:.1} l, left {:.1} l",
                total_weight,
                kg(total_weight),
                aggregate.remaining_weight,
                kg(aggregate.remaining_weight),
                aggregate.total_volume,
                aggregate.remaining_volume
            ),
        ],
    }
}

/// `name = 1000 g, 1.5 l`
pub fn item_line(name: &str, item: &Item, language: Language) -> String {
    match language {
        Language::Ru => format!("{} = {} гр., {} л", name, item.weight, item.volume),
        Language::En => format!("{} = {} g, {} l", name, item.weight, item.volume),
    }
}

/// Packed items, heaviest first; equal weights by name.
pub fn packed_lines<'a>(
    items: impl IntoIterator<Item = (&'a String, &'a Item)>,
    language: Language,
) -> Vec<String> {
    items
        .into_iter()
        .sorted_by(|(an, a), (bn, b)| b.weight.cmp(&a.weight).then_with(|| an.cmp(bn)))
        .map(|(name, item)| item_line(name, item, language))
        .collect()
}

/// `name (350 g, 0.4 l)` as listed when browsing the catalog.
pub fn catalog_line(item: &CatalogItem, language: Language) -> String {
    match language {
        Language::Ru => format!("{} ({} гр., {} л)", item.name, item.weight, item.volume),
        Language::En => format!("{} ({} g, {} l)", item.name, item.weight, item.volume),
    }
}

/// One fill gauge per dimension, `width` cells wide.
pub fn gauge_lines(aggregate: &Aggregate, width: usize, language: Language) -> Vec<String> {
    let (weight_label, volume_label, overweight, overfull) = match language {
        Language::Ru => ("Вес", "Объем", "Перевес", "Переполнен"),
        Language::En => ("Weight", "Volume", "Overweight", "Overfull"),
    };
    let label_width = weight_label
        .chars()
        .count()
        .max(volume_label.chars().count());

    let render = |label: &str, fill: f64, over: bool, warning: &str| {
        let filled = ((fill * width as f64).round() as usize).min(width);
        let bar = format!("{}{}", "#".repeat(filled), ".".repeat(width - filled));
        let pad = label_width - label.chars().count();
        let mut line = format!(
            "{}{} [{}] {:>3}%",
            label,
            " ".repeat(pad),
            bar,
            (fill * 100.0).round() as u32
        );
        if over {
            line.push_str("  ");
            line.push_str(warning);
        }
        line
    };

    vec![
        render(
            weight_label,
            aggregate.weight_fill(),
            aggregate.weight_over_limit,
            overweight,
        ),
        render(
            volume_label,
            aggregate.volume_fill(),
            aggregate.volume_over_limit,
            overfull,
        ),
    ]
}

/// Lines describing a greedy fit, one per accepted item plus totals.
pub fn fit_lines(outcome: &FitOutcome, language: Language) -> Vec<String> {
    let mut lines: Vec<String> = outcome
        .picks
        .iter()
        .map(|pick| match language {
            Language::Ru => format!(
                "{} = {} гр., осталось в рюкзаке {} гр.",
                pick.name, pick.weight, pick.remaining_after
            ),
            Language::En => format!(
                "{} = {} g, {} g left in the backpack",
                pick.name, pick.weight, pick.remaining_after
            ),
        })
        .collect();

    let count = outcome.count();
    match language {
        Language::Ru => {
            let word = russian_plural(count, ["вещь", "вещи", "вещей"]);
            lines.push(format!("В рюкзаке {count} {word}"));
            lines.push(format!("Осталось в рюкзаке {} гр.", outcome.remaining));
            lines.push(format!("Вес вещей в рюкзаке {} гр.", outcome.packed_weight()));
            lines.push(format!("Вес всех вещей {} гр.", outcome.catalog_weight));
        }
        Language::En => {
            lines.push(format!("Packed: {} {}", count, items_word(count, language)));
            lines.push(format!("Left in the backpack: {} g", outcome.remaining));
            lines.push(format!("Weight of packed items: {} g", outcome.packed_weight()));
            lines.push(format!("Weight of the whole kit: {} g", outcome.catalog_weight));
        }
    }
    lines
}
