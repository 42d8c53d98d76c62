//! 请求与响应 DTO

pub mod request;
pub mod response;

pub use request::{ListCustomersQuery, LoginRequest, RegisterCustomerRequest, SearchQuery};
pub use response::{
    ApiResponse, CurrentAdminResponse, CustomerDto, LoginResponse, PublicPointsDto,
};
