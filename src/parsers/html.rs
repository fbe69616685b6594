use crate::error::SessionError;
use crate::parsers::Projection;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Evaluates `selector` against `html` and projects every match, in document order.
///
/// Matches lacking a projected data attribute are skipped. No match at all
/// is an empty list, not an error.
pub fn select_all(
    html: &str,
    page_url: &str,
    selector: &str,
    projection: &Projection,
) -> Result<Vec<String>, SessionError> {
    let selector_parsed = create_selector(selector)?;
    let doc = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let values = doc
        .select(&selector_parsed)
        .filter_map(|element| project(element, base.as_ref(), projection))
        .collect::<Vec<String>>();

    ::log::debug!("Selector {} matched {} values", selector, values.len());
    Ok(values)
}

/// Evaluates `selector` against `html` and projects the first match.
pub fn select_one(
    html: &str,
    page_url: &str,
    selector: &str,
    projection: &Projection,
) -> Result<String, SessionError> {
    let selector_parsed = create_selector(selector)?;
    let doc = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let element = doc
        .select(&selector_parsed)
        .next()
        .ok_or_else(|| SessionError::MissingElement(selector.to_string()))?;

    project(element, base.as_ref(), projection).ok_or_else(|| SessionError::MissingValue {
        selector: selector.to_string(),
        projection: projection.to_string(),
    })
}

#[inline]
fn create_selector(selector: &str) -> Result<Selector, SessionError> {
    Selector::parse(selector).map_err(|_| SessionError::InvalidSelector(selector.to_string()))
}

fn project(element: ElementRef<'_>, base: Option<&Url>, projection: &Projection) -> Option<String> {
    match projection {
        Projection::Link => {
            // Same as reading `a.href` in a browser: relative links come back
            // absolute and an anchor without one reads as ""
            let Some(href) = element.value().attr("href") else {
                return Some(String::new());
            };
            match base.map(|b| b.join(href)) {
                Some(Ok(resolved)) => Some(resolved.to_string()),
                _ => Some(href.to_string()),
            }
        }
        Projection::Data(name) => element
            .value()
            .attr(&format!("data-{name}"))
            .map(str::to_string),
    }
}
