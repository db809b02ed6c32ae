//! Values built by concatenating literals and other records.
//!
//! A chain such as `[KeywordRef("OBJECT"), Literal("_"), KeywordRef("FILTER")]` resolves to
//! `M31_R` on a header where `OBJECT = 'M31'` and `FILTER = 'R'`. Referenced values are
//! concatenated in their [`Display`](std::fmt::Display) form.
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::edit_errors::HeaderEditError;
use crate::header::record::normalize_keyword;
use crate::header::value::HeaderValue;
use crate::header::HeaderStore;
use crate::params::EditorParams;

use super::{prepare_record, upsert};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainToken {
    /// Copied verbatim.
    Literal(String),
    /// Replaced by the value of the first record with this keyword.
    KeywordRef(String),
}

/// Resolve a chain against a header.
///
/// Arguments
/// -----------------
/// * `store`: the header providing referenced values.
/// * `tokens`: the chain, in order.
/// * `skip_missing_refs`: a reference to a missing keyword contributes nothing instead of
///   failing.
///
/// Return
/// ----------
/// * The concatenated string (possibly empty), or [`HeaderEditError::ChainKeywordMissing`]
///   naming the first missing keyword.
pub fn build_chain<S: HeaderStore + ?Sized>(
    store: &S,
    tokens: &[ChainToken],
    skip_missing_refs: bool,
) -> Result<String, HeaderEditError> {
    let parts = tokens
        .iter()
        .map(|token| match token {
            ChainToken::Literal(text) => Ok(Some(text.clone())),
            ChainToken::KeywordRef(keyword) => {
                let keyword = normalize_keyword(keyword);
                match store.find(&keyword) {
                    Some(record) => Ok(Some(record.value().to_string())),
                    None if skip_missing_refs => Ok(None),
                    None => Err(HeaderEditError::ChainKeywordMissing(keyword)),
                }
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(parts.into_iter().flatten().join(""))
}

pub(crate) fn chain_records<S: HeaderStore + ?Sized>(
    store: &mut S,
    keyword: &str,
    chain: &[ChainToken],
    comment: Option<&str>,
    update_if_exists: bool,
    skip_missing_refs: bool,
    params: &EditorParams,
) -> Result<String, HeaderEditError> {
    let keyword = normalize_keyword(keyword);
    let value = build_chain(&*store, chain, skip_missing_refs)?;
    if value.is_empty() {
        return Err(HeaderEditError::EmptyChainValue(keyword));
    }

    let record = prepare_record(&keyword, HeaderValue::Text(value), comment, params)?;
    upsert(store, record, update_if_exists)
}
