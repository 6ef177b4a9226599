use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

use crate::{AiscErrorExt, location, script};

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct RulesParser;

/// Keyword tokens carry no information beyond the rule that matched them.
pub(crate) fn is_keyword(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::kw_let
            | Rule::kw_if
            | Rule::kw_elif
            | Rule::kw_else
            | Rule::kw_each
            | Rule::kw_for
            | Rule::kw_loop
            | Rule::kw_break
            | Rule::kw_continue
            | Rule::kw_return
            | Rule::kw_eval
            | Rule::kw_match
            | Rule::kw_exists
    )
}

pub(crate) fn fetch_next_pair<'a>(
    pairs: &mut Pairs<'a, Rule>,
    location: &Option<location::Location>,
    span: &Option<location::Span>,
) -> Result<Pair<'a, Rule>, Box<dyn AiscErrorExt>> {
    loop {
        match pairs.next() {
            Some(pair) if is_keyword(pair.as_rule()) => continue,
            Some(pair) => return Ok(pair),
            None => {
                return Err(super::err::SyntaxError::boxed(
                    "Expected more inner pairs but found none.",
                    "aisc.ast.rules.fetch_next_pair",
                    location.clone(),
                    span.clone(),
                ));
            }
        }
    }
}

pub(crate) fn get_data_from_rule<'a>(
    rule: &Pair<'a, Rule>,
    script: &script::Script,
) -> (
    Pairs<'a, Rule>,
    Option<location::Location>,
    Option<location::Span>,
) {
    let inner_rules = rule.clone().into_inner();
    let span = get_span_from_pair(rule, script);
    let location = get_location_from_pair(rule, script);
    (inner_rules, location, span)
}

pub fn get_location_from_pair(
    rule: &Pair<Rule>,
    script: &script::Script,
) -> Option<location::Location> {
    let (line, column) = rule.as_span().start_pos().line_col();
    Some(location::Location::new(script.name.clone(), line, column))
}

pub fn get_span_from_pair(rule: &Pair<Rule>, script: &script::Script) -> Option<location::Span> {
    let span = rule.as_span();
    let (start_line, start_col) = span.start_pos().line_col();
    let (end_line, end_col) = span.end_pos().line_col();
    Some(location::Span::new(
        location::Location::new(script.name.clone(), start_line, start_col),
        location::Location::new(script.name.clone(), end_line, end_col),
    ))
}
