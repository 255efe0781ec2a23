pub mod inventory;
pub mod ledgers;
pub mod orders;
pub mod rates;
pub mod staff;
pub mod wholesaler;

use validator::ValidationError;

/// Required text fields must survive trimming; " " is as missing as "".
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("non_blank"));
    }
    Ok(())
}
