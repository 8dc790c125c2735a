use crate::utterance::{category_tag, tag_value, Token, Utterance};

pub const NUMBER_CATEGORY: &str = "NUMBER";

fn number(token: &str) -> Option<u32> {
    tag_value(token, NUMBER_CATEGORY)?.parse().ok()
}

fn hour(token: &str) -> Option<u32> {
    number(token).filter(|hour| *hour < 24)
}

fn minute(token: &str) -> Option<u32> {
    number(token).filter(|minute| *minute < 60)
}

fn time_tag(hour: u32, minute: u32) -> Token {
    category_tag("TIME", &format!("{}:{:02}", hour, minute))
}

/// Rewrites the number sequences which denote a time of day or a duration
/// into `TIME` tags
pub fn collapse_numbers(utterance: &Utterance) -> Utterance {
    let tokens = utterance.tokens();
    let mut collapsed: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut position = 0;
    while position < tokens.len() {
        match match_time(&tokens[position..]) {
            Some((nb_consumed, replacement)) => {
                collapsed.extend(replacement);
                position += nb_consumed;
            }
            None => {
                collapsed.push(tokens[position].clone());
                position += 1;
            }
        }
    }
    collapsed.into()
}

fn match_time(tokens: &[Token]) -> Option<(usize, Vec<Token>)> {
    match tokens {
        [fraction, relation, hour_token, ..] if fraction == "half" && relation == "past" => {
            hour(hour_token).map(|hour| (3, vec![time_tag(hour, 30)]))
        }
        [fraction, relation, hour_token, ..] if fraction == "quarter" && relation == "past" => {
            hour(hour_token).map(|hour| (3, vec![time_tag(hour, 15)]))
        }
        [fraction, relation, hour_token, ..] if fraction == "quarter" && relation == "to" => {
            hour(hour_token).map(|hour| (3, vec![time_tag((hour + 23) % 24, 45)]))
        }
        [preposition, article, unit, ..] if preposition == "in" && article == "an" && unit == "hour" => {
            Some((3, vec![preposition.clone(), time_tag(1, 0)]))
        }
        [preposition, hour_token, ..] if preposition == "at" && match_number_time(&tokens[1..]).is_none() => {
            hour(hour_token).map(|hour| (2, vec![preposition.clone(), time_tag(hour, 0)]))
        }
        [first, ..] if number(first).is_some() => match_number_time(tokens),
        _ => None,
    }
}

fn match_number_time(tokens: &[Token]) -> Option<(usize, Vec<Token>)> {
    let first = number(tokens.first()?)?;
    let second = tokens.get(1);
    if first < 24 {
        match second.and_then(|token| minute(token)) {
            Some(minutes) if minutes > 9 => return Some((2, vec![time_tag(first, minutes)])),
            Some(0) => {
                if let Some(minutes) = tokens
                    .get(2)
                    .and_then(|token| minute(token))
                    .filter(|minutes| *minutes <= 9)
                {
                    return Some((3, vec![time_tag(first, minutes)]));
                }
            }
            _ => (),
        }
        if second.map_or(false, |token| token == "o'clock") {
            return Some((2, vec![time_tag(first, 0)]));
        }
    }
    if first < 60 && second.map_or(false, |token| token == "minutes" || token == "minute") {
        return Some((2, vec![time_tag(0, first)]));
    }
    None
}
