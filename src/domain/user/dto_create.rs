/// Fields accepted when creating a user. Absent values are reported
/// back as a validation error by the service.
#[derive(Debug, Clone, Default)]
pub struct CreateUserDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub password: Option<String>,
}
