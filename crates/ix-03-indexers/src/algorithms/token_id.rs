//! # Token Id Allocation
//!
//! DAT ids count up from 1 below [`DST_ID_START`]; every other token counts up
//! from [`DST_ID_START`]. A DAT allocation that would reach the boundary
//! spills into the upper range.
//!
//! The current maximum comes from a descending scan of the token partition,
//! raised by the [`TokenIdWatermark`] so an id is never handed out twice,
//! even after the block that first took it is invalidated.

use ix_02_model_store::{keys, ModelStore, ScanOrder, Token, TokenIdWatermark, DST_ID_START};

use crate::domain::errors::IndexingError;

/// Next free id for a token of the given class.
pub fn next_token_id(store: &ModelStore, is_dat: bool) -> Result<u32, IndexingError> {
    let watermark = store
        .get::<TokenIdWatermark>(TokenIdWatermark::ID)?
        .unwrap_or_default();

    if is_dat {
        let cursor = keys::token_id(DST_ID_START);
        let live = store
            .query::<Token>(Token::PARTITION, 1, ScanOrder::Descending, Some(&cursor))?
            .into_iter()
            .next()
            .map(|token| token.id)
            .unwrap_or(0);
        let candidate = live.max(watermark.highest_dat) + 1;
        if candidate < DST_ID_START {
            return Ok(candidate);
        }
    }

    let live = store
        .latest::<Token>(Token::PARTITION)?
        .map(|token| token.id)
        .filter(|id| *id >= DST_ID_START);
    match live.max(watermark.highest_dst) {
        Some(highest) => highest.checked_add(1).ok_or(IndexingError::TokenIdExhausted),
        None => Ok(DST_ID_START),
    }
}

/// Record `id` as handed out. The watermark never moves down.
pub fn raise_watermark(store: &mut ModelStore, id: u32) -> Result<(), IndexingError> {
    let mut watermark = store
        .get::<TokenIdWatermark>(TokenIdWatermark::ID)?
        .unwrap_or_default();
    let before = watermark;

    if id < DST_ID_START {
        watermark.highest_dat = watermark.highest_dat.max(id);
    } else {
        watermark.highest_dst = Some(watermark.highest_dst.map_or(id, |h| h.max(id)));
    }

    if watermark != before {
        store.put(&watermark)?;
    }
    Ok(())
}
