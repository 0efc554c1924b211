//! Portal endpoint paths.
//!
//! These are the portal's own paths, spelling included
//! (`CheckMachingOrganization`), and must not be corrected.

/// Landing page carrying the anti-forgery token
pub const LANDING_PAGE: &str = "/";

pub const LOGIN: &str = "/api/User/Login";
pub const LOGIN_TWO_FACTOR: &str = "/api/User/Login2FA";

pub const REVOCATION_REASONS: &str = "/api/Certificate/GetRevocationReasons";
pub const GET_CERTIFICATE: &str = "/api/Certificate/GetCertificate";

pub const DOMAIN_VALIDATIONS: &str = "/api/ServerCertificate/GetDomainValidations";
pub const CHECK_DOMAIN_NAMES: &str = "/api/ServerCertificate/CheckDomainNames";
pub const CHECK_MATCHING_ORGANIZATION: &str = "/api/ServerCertificate/CheckMachingOrganization";
pub const REQUEST_SERVER_CERTIFICATE: &str = "/api/ServerCertificate/RequestServerCertificate";

pub const PENDING_REVIEWS: &str = "/api/OrganizationValidatorSSL/GetSSLReviewableTransactions";
pub const UPDATE_REVIEWS: &str = "/api/OrganizationValidatorSSL/UpdateReviews";
