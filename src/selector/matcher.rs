use crate::dom::node::{NodeId, PageDom};
use crate::page::error::PerceptionError;

// ============================================================================
// Selector matching
// ============================================================================
//
// A practical subset of CSS: tag or `*`, `#id`, `.class`, `[attr]`,
// `[attr=value]`, `:nth-of-type(n)`, with descendant (whitespace) and child
// (`>`) combinators. Enough to resolve built selectors and to let callers
// name interesting elements in a capture.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
    nth_of_type: Option<usize>,
}

/// A parsed selector: compounds right-to-left linked by combinators. The
/// combinator stored with a compound links it to the compound on its left.
#[derive(Debug, Clone)]
pub struct ParsedSelector {
    parts: Vec<(Combinator, Compound)>,
}

fn parse_error(selector: &str, reason: &str) -> PerceptionError {
    PerceptionError::SelectorParse {
        selector: selector.to_string(),
        reason: reason.to_string(),
    }
}

pub fn parse(input: &str) -> Result<ParsedSelector, PerceptionError> {
    let mut raw_parts: Vec<(Combinator, String)> = Vec::new();
    let mut current = String::new();
    let mut combinator = Combinator::Descendant;
    let mut bracket_depth = 0usize;
    let mut pending_descendant = false;

    for ch in input.chars() {
        if bracket_depth > 0 {
            if ch == ']' || ch == ')' {
                bracket_depth -= 1;
            } else if ch == '[' || ch == '(' {
                bracket_depth += 1;
            }
            current.push(ch);
            continue;
        }
        match ch {
            '[' | '(' => {
                bracket_depth += 1;
                current.push(ch);
            }
            '>' => {
                if current.is_empty() && raw_parts.is_empty() {
                    return Err(parse_error(input, "leading combinator"));
                }
                if !current.is_empty() {
                    raw_parts.push((combinator, std::mem::take(&mut current)));
                }
                combinator = Combinator::Child;
                pending_descendant = false;
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    pending_descendant = true;
                }
            }
            _ => {
                if pending_descendant {
                    raw_parts.push((combinator, std::mem::take(&mut current)));
                    combinator = Combinator::Descendant;
                    pending_descendant = false;
                }
                current.push(ch);
            }
        }
    }
    if bracket_depth > 0 {
        return Err(parse_error(input, "unclosed bracket"));
    }
    if !current.is_empty() {
        raw_parts.push((combinator, current));
    }
    if raw_parts.is_empty() {
        return Err(parse_error(input, "empty selector"));
    }

    let mut parts = Vec::with_capacity(raw_parts.len());
    for (combinator, raw) in raw_parts {
        parts.push((combinator, parse_compound(&raw, input)?));
    }
    Ok(ParsedSelector { parts })
}

fn parse_compound(raw: &str, full: &str) -> Result<Compound, PerceptionError> {
    let mut compound = Compound::default();
    let mut chars = raw.chars().peekable();

    // Optional leading tag name (or the universal `*`)
    let mut tag = String::new();
    while let Some(&ch) = chars.peek() {
        if ch == '#' || ch == '.' || ch == '[' || ch == ':' {
            break;
        }
        tag.push(ch);
        chars.next();
    }
    if !tag.is_empty() && tag != "*" {
        compound.tag = Some(tag.to_lowercase());
    }

    while let Some(ch) = chars.next() {
        match ch {
            '#' => {
                let name = take_name(&mut chars);
                if name.is_empty() {
                    return Err(parse_error(full, "empty id"));
                }
                compound.id = Some(name);
            }
            '.' => {
                let name = take_name(&mut chars);
                if name.is_empty() {
                    return Err(parse_error(full, "empty class"));
                }
                compound.classes.push(name);
            }
            '[' => {
                let mut body = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' {
                        closed = true;
                        break;
                    }
                    body.push(inner);
                }
                if !closed {
                    return Err(parse_error(full, "unclosed attribute"));
                }
                match body.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim_matches(|c| c == '"' || c == '\'');
                        compound
                            .attrs
                            .push((name.trim().to_string(), Some(value.to_string())));
                    }
                    None => compound.attrs.push((body.trim().to_string(), None)),
                }
            }
            ':' => {
                let pseudo: String = chars.by_ref().collect();
                let Some(argument) = pseudo
                    .strip_prefix("nth-of-type(")
                    .and_then(|rest| rest.strip_suffix(')'))
                else {
                    return Err(parse_error(full, "unsupported pseudo-class"));
                };
                let index: usize = argument
                    .trim()
                    .parse()
                    .map_err(|_| parse_error(full, "bad nth-of-type index"))?;
                compound.nth_of_type = Some(index);
            }
            _ => return Err(parse_error(full, "unexpected character")),
        }
    }

    Ok(compound)
}

fn take_name(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&ch) = chars.peek() {
        if ch == '#' || ch == '.' || ch == '[' || ch == ':' {
            break;
        }
        name.push(ch);
        chars.next();
    }
    name
}

fn matches_compound(dom: &PageDom, node: NodeId, compound: &Compound) -> bool {
    let Some(el) = dom.element(node) else {
        return false;
    };

    if let Some(tag) = &compound.tag {
        if el.tag != *tag {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if el.attr("id") != Some(id.as_str()) {
            return false;
        }
    }
    for class in &compound.classes {
        let has_class = el
            .attr("class")
            .is_some_and(|attr| attr.split_whitespace().any(|c| c == class));
        if !has_class {
            return false;
        }
    }
    for (name, value) in &compound.attrs {
        match (el.attr(name), value) {
            (None, _) => return false,
            (Some(actual), Some(expected)) if actual != expected => return false,
            _ => {}
        }
    }
    if let Some(nth) = compound.nth_of_type {
        let position = match dom.parent_element(node) {
            Some(parent) => dom
                .child_elements(parent)
                .into_iter()
                .filter(|id| dom.element(*id).is_some_and(|sib| sib.tag == el.tag))
                .position(|id| id == node)
                .map(|p| p + 1),
            // A root is trivially the first of its type
            None => Some(1),
        };
        if position != Some(nth) {
            return false;
        }
    }
    true
}

fn matches_from(dom: &PageDom, node: NodeId, parts: &[(Combinator, Compound)], idx: usize) -> bool {
    if idx == 0 {
        return true;
    }
    let combinator = parts[idx].0;
    let target = &parts[idx - 1].1;
    match combinator {
        Combinator::Child => match dom.parent_element(node) {
            Some(parent) => {
                matches_compound(dom, parent, target) && matches_from(dom, parent, parts, idx - 1)
            }
            None => false,
        },
        Combinator::Descendant => {
            let mut cursor = dom.parent_element(node);
            while let Some(ancestor) = cursor {
                if matches_compound(dom, ancestor, target)
                    && matches_from(dom, ancestor, parts, idx - 1)
                {
                    return true;
                }
                cursor = dom.parent_element(ancestor);
            }
            false
        }
    }
}

/// True when the selector matches the given element.
pub fn matches(dom: &PageDom, node: NodeId, selector: &ParsedSelector) -> bool {
    let last = selector.parts.len() - 1;
    matches_compound(dom, node, &selector.parts[last].1)
        && matches_from(dom, node, &selector.parts, last)
}

/// All matching elements, in document order. No match is an empty result,
/// not an error.
pub fn query(dom: &PageDom, selector: &ParsedSelector) -> Vec<NodeId> {
    dom.elements()
        .into_iter()
        .filter(|id| matches(dom, *id, selector))
        .collect()
}

pub fn query_first(dom: &PageDom, selector: &ParsedSelector) -> Option<NodeId> {
    dom.elements()
        .into_iter()
        .find(|id| matches(dom, *id, selector))
}

/// Resolve a selector that must match exactly one element. Zero or multiple
/// matches indicate an integration bug upstream and fail loudly.
pub fn query_unique(dom: &PageDom, selector: &str) -> Result<NodeId, PerceptionError> {
    let parsed = parse(selector)?;
    let found = query(dom, &parsed);
    if found.len() != 1 {
        return Err(PerceptionError::SelectorNotUnique {
            selector: selector.to_string(),
            matches: found.len(),
        });
    }
    Ok(found[0])
}
