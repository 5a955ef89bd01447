use crate::clock::Clock;
use crate::domain::Entity;
use crate::error::ValidationError;
use crate::validation::{
    self, MAX_ADDRESS_LENGTH, MAX_ID_LENGTH, MAX_NAME_LENGTH, PHONE_LENGTH,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A person in the address book.
///
/// * `contact_id`: 1-10 characters, fixed at construction
/// * `first_name`, `last_name`: 1-10 characters
/// * `phone`: exactly 10 ASCII digits, stored as given
/// * `address`: 1-30 characters
///
/// String fields other than `phone` are stored trimmed.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "camelCase", try_from = "ContactRecord")
)]
pub struct Contact {
    contact_id: String,
    first_name: String,
    last_name: String,
    phone: String,
    address: String,
}

/// New values for every mutable [`Contact`] field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
}

impl ContactFields {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }
}

impl Contact {
    pub fn new(
        contact_id: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<Self, ValidationError> {
        let contact_id =
            validation::validate_trimmed_length(contact_id, "contactId", 1, MAX_ID_LENGTH)?;
        Ok(Self {
            contact_id,
            first_name: normalize_name(first_name, "firstName")?,
            last_name: normalize_name(last_name, "lastName")?,
            phone: validate_phone(phone)?,
            address: normalize_address(address)?,
        })
    }

    pub fn contact_id(&self) -> &str {
        &self.contact_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn set_first_name(&mut self, first_name: &str) -> Result<(), ValidationError> {
        self.first_name = normalize_name(first_name, "firstName")?;
        Ok(())
    }

    pub fn set_last_name(&mut self, last_name: &str) -> Result<(), ValidationError> {
        self.last_name = normalize_name(last_name, "lastName")?;
        Ok(())
    }

    pub fn set_phone(&mut self, phone: &str) -> Result<(), ValidationError> {
        self.phone = validate_phone(phone)?;
        Ok(())
    }

    pub fn set_address(&mut self, address: &str) -> Result<(), ValidationError> {
        self.address = normalize_address(address)?;
        Ok(())
    }

    /// Replaces all mutable fields, or none of them if any value is invalid.
    pub fn update(&mut self, fields: &ContactFields) -> Result<(), ValidationError> {
        let first_name = normalize_name(&fields.first_name, "firstName")?;
        let last_name = normalize_name(&fields.last_name, "lastName")?;
        let phone = validate_phone(&fields.phone)?;
        let address = normalize_address(&fields.address)?;

        self.first_name = first_name;
        self.last_name = last_name;
        self.phone = phone;
        self.address = address;
        Ok(())
    }

    pub fn copy(&self) -> Result<Self, ValidationError> {
        if self.contact_id.is_empty()
            || self.first_name.is_empty()
            || self.last_name.is_empty()
            || self.phone.is_empty()
            || self.address.is_empty()
        {
            return Err(ValidationError::CorruptCopySource { entity: "contact" });
        }
        Contact::new(
            &self.contact_id,
            &self.first_name,
            &self.last_name,
            &self.phone,
            &self.address,
        )
    }
}

impl Entity for Contact {
    type Fields = ContactFields;

    const KIND: &'static str = "Contact";
    const ID_LABEL: &'static str = "contactId";

    fn id(&self) -> &str {
        &self.contact_id
    }

    fn apply(&mut self, fields: ContactFields, _clock: &dyn Clock) -> Result<(), ValidationError> {
        self.update(&fields)
    }

    fn copy(&self) -> Result<Self, ValidationError> {
        Contact::copy(self)
    }
}

fn normalize_name(value: &str, label: &'static str) -> Result<String, ValidationError> {
    validation::validate_trimmed_length(value, label, 1, MAX_NAME_LENGTH)
}

fn normalize_address(value: &str) -> Result<String, ValidationError> {
    validation::validate_trimmed_length(value, "address", 1, MAX_ADDRESS_LENGTH)
}

fn validate_phone(phone: &str) -> Result<String, ValidationError> {
    validation::validate_digits(phone, "phone", PHONE_LENGTH)?;
    Ok(phone.to_string())
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactRecord {
    contact_id: String,
    first_name: String,
    last_name: String,
    phone: String,
    address: String,
}

#[cfg(feature = "serde")]
impl TryFrom<ContactRecord> for Contact {
    type Error = ValidationError;

    fn try_from(record: ContactRecord) -> Result<Self, Self::Error> {
        Contact::new(
            &record.contact_id,
            &record.first_name,
            &record.last_name,
            &record.phone,
            &record.address,
        )
    }
}
