use serde::Deserialize;

/// Payload of the `auth.register` operation.
///
/// Field format checks (valid email, password strength) belong to the
/// validation layer in front of the dispatcher; by the time this struct
/// reaches the identity service the fields are assumed well-formed.
#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
