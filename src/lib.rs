use crate::active::classifier::find_active_elements;
use crate::dom::loader::LoadedPage;
use crate::page::error::PerceptionError;
use crate::page::session::PageSession;
use crate::snapshot::record::ElementRecord;
use crate::snapshot::walker::snapshot;

pub mod active;
pub mod cli;
pub mod dom;
pub mod identity;
pub mod listeners;
pub mod obstruct;
pub mod page;
pub mod selector;
pub mod snapshot;
pub mod trace;

/// Combined result of one perception pass over a page.
#[derive(Debug)]
pub struct Perception {
    pub records: Vec<ElementRecord>,
    pub active_uids: Vec<i64>,
}

/// Run the full perception pipeline over a loaded page: ensure identity and
/// extract metadata for every element, then classify the actionable subset.
///
/// Safe to call repeatedly against the same page; uids stay stable for
/// elements that persist between calls.
pub fn perceive(
    page: &mut LoadedPage,
    session: &mut PageSession,
) -> Result<Perception, PerceptionError> {
    let records = snapshot(&mut page.dom, session)?;
    let active_uids = find_active_elements(&page.dom, &page.registry);

    Ok(Perception {
        records,
        active_uids,
    })
}
