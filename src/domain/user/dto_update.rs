/// Fields accepted when updating a user.
///
/// Everything except `password` is required; when `password` is absent
/// the stored hash is left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub password: Option<String>,
}
