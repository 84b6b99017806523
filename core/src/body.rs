//! JSON encoding of request bodies and decoding into response targets.
//!
//! `()` means "no body" on the request side and "don't decode" on the
//! response side, so call sites read as `client.post("/user", &user, ())`.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A value that may be sent as a JSON request body.
pub trait RequestBody {
    /// `Ok(None)` when there is no body to send.
    fn encode(&self) -> Result<Option<Vec<u8>>, serde_json::Error>;
}

impl RequestBody for () {
    fn encode(&self) -> Result<Option<Vec<u8>>, serde_json::Error> {
        Ok(None)
    }
}

impl<T: Serialize + ?Sized> RequestBody for &T {
    fn encode(&self) -> Result<Option<Vec<u8>>, serde_json::Error> {
        serde_json::to_vec(*self).map(Some)
    }
}

impl<T: Serialize + ?Sized> RequestBody for Option<&T> {
    fn encode(&self) -> Result<Option<Vec<u8>>, serde_json::Error> {
        self.map(serde_json::to_vec).transpose()
    }
}

/// A caller-owned slot the response body is decoded into.
pub trait ResponseTarget {
    /// When false the body is never parsed.
    fn wants_body(&self) -> bool;

    fn decode(self, body: &[u8]) -> Result<(), serde_json::Error>;
}

impl ResponseTarget for () {
    fn wants_body(&self) -> bool {
        false
    }

    fn decode(self, _body: &[u8]) -> Result<(), serde_json::Error> {
        Ok(())
    }
}

impl<T: DeserializeOwned> ResponseTarget for &mut T {
    fn wants_body(&self) -> bool {
        true
    }

    fn decode(self, body: &[u8]) -> Result<(), serde_json::Error> {
        *self = decode_first(body)?;
        Ok(())
    }
}

impl<T: DeserializeOwned> ResponseTarget for Option<&mut T> {
    fn wants_body(&self) -> bool {
        self.is_some()
    }

    fn decode(self, body: &[u8]) -> Result<(), serde_json::Error> {
        match self {
            Some(target) => target.decode(body),
            None => Ok(()),
        }
    }
}

/// Decode the first JSON value in `body`; anything after it is ignored.
pub(crate) fn decode_first<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<T>()
        .next()
    {
        Some(value) => value,
        // Empty or whitespace-only body: let the strict parser report EOF.
        None => serde_json::from_slice(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct User {
        #[serde(rename = "Name")]
        name: String,
    }

    #[test]
    fn unit_has_no_body() {
        assert_eq!(().encode().unwrap(), None);
    }

    #[test]
    fn reference_encodes_as_json() {
        let user = User {
            name: "John".into(),
        };
        let bytes = (&user).encode().unwrap().unwrap();
        assert_eq!(bytes, br#"{"Name":"John"}"#);
    }

    #[test]
    fn none_option_has_no_body() {
        let body: Option<&User> = None;
        assert_eq!(body.encode().unwrap(), None);
    }

    #[test]
    fn unit_target_never_decodes() {
        assert!(!().wants_body());
        assert!(().decode(b"definitely not json").is_ok());
    }

    #[test]
    fn target_is_overwritten() {
        let mut user = User::default();
        (&mut user).decode(br#"{"Name":"Jane"}"#).unwrap();
        assert_eq!(user.name, "Jane");
    }

    #[test]
    fn trailing_data_after_first_value_is_ignored() {
        let mut user = User::default();
        (&mut user)
            .decode(b"{\"Name\":\"Jane\"}\n{\"Name\":\"ignored\"}")
            .unwrap();
        assert_eq!(user.name, "Jane");
    }

    #[test]
    fn empty_body_is_an_error() {
        let mut user = User::default();
        assert!((&mut user).decode(b"").is_err());
        assert!((&mut user).decode(b"  \n").is_err());
    }

    #[test]
    fn type_mismatch_is_an_error() {
        let mut user = User::default();
        let err = (&mut user).decode(br#"{"Name":5}"#).unwrap_err();
        assert!(err.is_data());
        assert_eq!(user, User::default());
    }

    #[test]
    fn optional_target() {
        let none: Option<&mut User> = None;
        assert!(!none.wants_body());

        let mut user = User::default();
        let some = Some(&mut user);
        assert!(some.wants_body());
        some.decode(br#"{"Name":"Ann"}"#).unwrap();
        assert_eq!(user.name, "Ann");
    }
}
