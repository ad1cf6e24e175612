//! Token creation, plain and loan.

use bigdecimal::BigDecimal;
use ix_01_dftx::{CreateToken, DfTx, DfTxRecord, DfTxType};
use ix_02_model_store::{LoanTokenInfo, ModelStore, Token, TokenCreation};
use shared_types::{BlockContext, RawBlock};

use crate::algorithms::token_id;
use crate::domain::errors::IndexingError;
use crate::ports::indexer::Indexer;

/// Fields of a new token; the id is allocated on insert.
pub(crate) struct NewToken {
    pub symbol: String,
    pub name: String,
    pub decimal: u8,
    pub limit: BigDecimal,
    pub mintable: bool,
    pub tradeable: bool,
    pub is_dat: bool,
    pub is_lps: bool,
    pub finalized: bool,
    pub loan: Option<LoanTokenInfo>,
}

/// Allocate an id and store the token with the creation row of `record`.
pub(crate) fn insert_token(
    store: &mut ModelStore,
    new: NewToken,
    record: &DfTxRecord<'_>,
    block: &BlockContext,
) -> Result<Token, IndexingError> {
    let txid = record.txid();
    let id = token_id::next_token_id(store, new.is_dat)?;
    let token = Token {
        id,
        symbol: new.symbol,
        name: new.name,
        decimal: new.decimal,
        limit: new.limit,
        mintable: new.mintable,
        tradeable: new.tradeable,
        is_dat: new.is_dat,
        is_lps: new.is_lps,
        finalized: new.finalized,
        loan: new.loan,
        creation_txid: txid.to_string(),
        block: block.clone(),
    };

    store.put(&token)?;
    store.put(&TokenCreation {
        outpoint: record.outpoint(),
        txid: txid.to_string(),
        token_id: id,
    })?;
    token_id::raise_watermark(store, id)?;

    tracing::debug!(token_id = id, symbol = %token.symbol, "[ix-03] token created");
    Ok(token)
}

/// Remove the token created by `record`. The id watermark is left as is.
pub(crate) fn remove_token(
    store: &mut ModelStore,
    record: &DfTxRecord<'_>,
) -> Result<u32, IndexingError> {
    let outpoint = record.outpoint();
    let creation = store
        .get::<TokenCreation>(&outpoint)?
        .ok_or_else(|| IndexingError::TokenNotFound {
            token: outpoint.clone(),
        })?;
    store.delete::<Token>(&creation.token_id.to_string())?;
    store.delete::<TokenCreation>(&outpoint)?;
    Ok(creation.token_id)
}

#[derive(Debug, Default)]
pub struct CreateTokenIndexer;

impl CreateTokenIndexer {
    fn new_token(msg: &CreateToken) -> NewToken {
        NewToken {
            symbol: msg.symbol.clone(),
            name: msg.name.clone(),
            decimal: msg.decimal,
            limit: msg.limit.to_decimal(),
            mintable: msg.has_flag(CreateToken::FLAG_MINTABLE),
            tradeable: msg.has_flag(CreateToken::FLAG_TRADEABLE),
            is_dat: msg.is_dat(),
            is_lps: msg.has_flag(CreateToken::FLAG_LPS),
            finalized: msg.has_flag(CreateToken::FLAG_FINALIZED),
            loan: None,
        }
    }
}

impl Indexer for CreateTokenIndexer {
    fn name(&self) -> &'static str {
        "CreateToken"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::CreateToken)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::CreateToken(msg) = &record.dftx else {
            return Ok(());
        };
        insert_token(store, Self::new_token(msg), record, &block.context())?;
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        _block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        remove_token(store, record)?;
        Ok(())
    }
}

/// Loan tokens are always DAT and track a fixed-interval price id.
#[derive(Debug, Default)]
pub struct SetLoanTokenIndexer;

impl Indexer for SetLoanTokenIndexer {
    fn name(&self) -> &'static str {
        "SetLoanToken"
    }

    fn opcode(&self) -> Option<DfTxType> {
        Some(DfTxType::SetLoanToken)
    }

    fn on_transaction(
        &self,
        store: &mut ModelStore,
        block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        let DfTx::SetLoanToken(msg) = &record.dftx else {
            return Ok(());
        };
        let pair = &msg.currency_pair;
        let new = NewToken {
            symbol: msg.symbol.clone(),
            name: msg.name.clone(),
            decimal: 8,
            limit: BigDecimal::from(0).with_scale(8),
            mintable: msg.mintable,
            tradeable: true,
            is_dat: true,
            is_lps: false,
            finalized: false,
            loan: Some(LoanTokenInfo {
                fixed_interval_price_id: format!("{}/{}", pair.token, pair.currency),
                interest: msg.interest.to_decimal(),
            }),
        };
        insert_token(store, new, record, &block.context())?;
        Ok(())
    }

    fn on_transaction_undo(
        &self,
        store: &mut ModelStore,
        _block: &RawBlock,
        record: &DfTxRecord<'_>,
    ) -> Result<(), IndexingError> {
        remove_token(store, record)?;
        Ok(())
    }
}
