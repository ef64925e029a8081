use anyhow::{anyhow, bail, Context, Result};
use fit_tracker::models::{CardioCategory, CardioSet, ExerciseKind, ExerciseLog, StrengthSet};

/// Parse an exercise given on the command line.
///
/// Strength: `name:strength:WEIGHTxREPS,...` (a bare `REPS` is bodyweight).
/// Cardio: `name:cardio[:category]:MINUTES[@INTENSITY],...` where the
/// intensity is speed, incline, level or resistance depending on the category.
pub fn parse_exercise(spec: &str) -> Result<ExerciseLog> {
    let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
    if parts.len() < 3 {
        bail!(
            "Invalid exercise '{}': expected name:strength:60x8 or name:cardio:30@10",
            spec
        );
    }

    let name = parts[0];
    if name.is_empty() {
        bail!("Invalid exercise '{}': name is empty", spec);
    }

    let kind: ExerciseKind = parts[1].parse()?;
    match (kind, parts.len()) {
        (ExerciseKind::Strength, 3) => {
            let sets = parse_list(parts[2], parse_strength_set)
                .with_context(|| format!("Invalid sets in '{}'", spec))?;
            Ok(ExerciseLog::strength(name, sets))
        }
        (ExerciseKind::Cardio, 3) => {
            let category = name.parse::<CardioCategory>().ok();
            cardio(name, category, parts[2], spec)
        }
        (ExerciseKind::Cardio, 4) => {
            let category: CardioCategory = parts[2].parse()?;
            cardio(name, Some(category), parts[3], spec)
        }
        _ => bail!("Invalid exercise '{}': too many fields", spec),
    }
}

fn cardio(
    name: &str,
    category: Option<CardioCategory>,
    sets: &str,
    spec: &str,
) -> Result<ExerciseLog> {
    let category_for_sets = category.unwrap_or(CardioCategory::Other);
    let sets = parse_list(sets, |set| parse_cardio_set(set, category_for_sets))
        .with_context(|| format!("Invalid sets in '{}'", spec))?;
    Ok(ExerciseLog::cardio(name, category, sets))
}

fn parse_list<T>(list: &str, parse: impl Fn(&str) -> Result<T>) -> Result<Vec<T>> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse)
        .collect()
}

fn number(text: &str) -> Result<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| anyhow!("'{}' is not a number", text))?;
    if !value.is_finite() || value < 0.0 {
        bail!("'{}' must be a non-negative number", text);
    }
    Ok(value)
}

fn parse_strength_set(set: &str) -> Result<StrengthSet> {
    match set.split_once(['x', 'X']) {
        Some((weight, reps)) => {
            let reps = reps
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("'{}' is not a rep count", reps))?;
            Ok(StrengthSet::new(number(weight)?, reps))
        }
        None => {
            let reps = set
                .parse::<u32>()
                .map_err(|_| anyhow!("'{}' is not a rep count", set))?;
            Ok(StrengthSet::new(0.0, reps))
        }
    }
}

fn parse_cardio_set(set: &str, category: CardioCategory) -> Result<CardioSet> {
    let (minutes, intensity) = match set.split_once('@') {
        Some((minutes, intensity)) => (minutes, Some(number(intensity)?)),
        None => (set, None),
    };

    let base = CardioSet::minutes(number(minutes)?);
    let Some(intensity) = intensity else {
        return Ok(base);
    };

    Ok(match category {
        CardioCategory::InclineWalk => base.with_incline(intensity),
        CardioCategory::Stairmaster => base.with_level(intensity),
        CardioCategory::Cycling | CardioCategory::Elliptical => base.with_resistance(intensity),
        _ => base.with_speed(intensity),
    })
}
