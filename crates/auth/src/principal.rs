storefront_core::uuid_newtype! {
    /// Identity of an authenticated principal (human user, service account, etc).
    pub struct PrincipalId;
}
