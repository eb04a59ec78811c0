//! Request DTOs
//!
//! Data structures for API request bodies and list query strings.
//! Full-replace (`PUT`) bodies require every writable field; `PATCH` bodies
//! make every field optional.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::domain::{
    ApplicantDraft, ApplicantFilter, ApplicantPatch, ApplicationDraft, ApplicationFilter,
    ApplicationPatch, ApplicationStatus, CustomerDraft, CustomerPatch, DateRange, JobDraft,
    JobFilter, JobPatch, LineDraft, OrderDraft, OrderFilter, ProductDraft, ProductPatch,
};
use crate::application::services::OrderChanges;
use crate::shared::error::AppError;
use crate::shared::pagination::PageRequest;
use crate::shared::validation::{validate_phone, validate_price};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_status(raw: &str) -> Result<ApplicationStatus, AppError> {
    raw.parse()
        .map_err(|e: crate::domain::InvalidStatus| AppError::field("status", e.to_string()))
}

/// Token request
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub username: String,

    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub refresh: String,
}

// ---------------------------------------------------------------------------
// Recruiting
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct ApplicantRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,

    #[validate(
        length(max = 15, message = "Phone must be at most 15 characters"),
        custom(function = "validate_phone")
    )]
    pub phone: Option<String>,
}

impl From<ApplicantRequest> for ApplicantDraft {
    fn from(req: ApplicantRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
        }
    }
}

impl ApplicantRequest {
    /// A patch that overwrites every field; a missing phone clears it.
    pub fn into_patch(self) -> ApplicantPatch {
        ApplicantPatch {
            name: Some(self.name),
            email: Some(self.email),
            phone: Some(self.phone),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ApplicantPatchRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(
        length(max = 15, message = "Phone must be at most 15 characters"),
        custom(function = "validate_phone")
    )]
    pub phone: Option<Option<String>>,
}

impl From<ApplicantPatchRequest> for ApplicantPatch {
    fn from(req: ApplicantPatchRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct JobRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: String,
}

impl From<JobRequest> for JobDraft {
    fn from(req: JobRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}

impl From<JobRequest> for JobPatch {
    fn from(req: JobRequest) -> Self {
        Self {
            title: Some(req.title),
            description: Some(req.description),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct JobPatchRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: Option<String>,
}

impl From<JobPatchRequest> for JobPatch {
    fn from(req: JobPatchRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}

/// Body of `POST /api/apply/`
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyRequest {
    pub applicant_id: i64,
    pub job_id: i64,
}

/// Application body; `status` defaults to `applied` on create.
#[derive(Debug, Deserialize, Validate)]
pub struct ApplicationRequest {
    pub applicant: i64,
    pub job: i64,
    pub status: Option<String>,
}

impl ApplicationRequest {
    pub fn into_draft(self) -> Result<ApplicationDraft, AppError> {
        let status = match self.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => ApplicationStatus::default(),
        };
        Ok(ApplicationDraft {
            applicant_id: self.applicant,
            job_id: self.job,
            status,
        })
    }

    /// Full replace; a missing status keeps the stored one.
    pub fn into_patch(self) -> Result<ApplicationPatch, AppError> {
        Ok(ApplicationPatch {
            applicant_id: Some(self.applicant),
            job_id: Some(self.job),
            status: self.status.as_deref().map(parse_status).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ApplicationPatchRequest {
    pub applicant: Option<i64>,
    pub job: Option<i64>,
    pub status: Option<String>,
}

impl ApplicationPatchRequest {
    pub fn into_patch(self) -> Result<ApplicationPatch, AppError> {
        Ok(ApplicationPatch {
            applicant_id: self.applicant,
            job_id: self.job,
            status: self.status.as_deref().map(parse_status).transpose()?,
        })
    }
}

/// Body of `PATCH /api/applications/{id}/status/`
#[derive(Debug, Deserialize, Validate)]
pub struct StatusUpdateRequest {
    pub status: String,
}

impl StatusUpdateRequest {
    pub fn status(&self) -> Result<ApplicationStatus, AppError> {
        parse_status(&self.status)
    }
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,
}

impl From<CustomerRequest> for CustomerDraft {
    fn from(req: CustomerRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

impl From<CustomerRequest> for CustomerPatch {
    fn from(req: CustomerRequest) -> Self {
        Self {
            name: Some(req.name),
            email: Some(req.email),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerPatchRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
}

impl From<CustomerPatchRequest> for CustomerPatch {
    fn from(req: CustomerPatchRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

/// Price accepts a JSON string (`"19.99"`) or number.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
}

impl From<ProductRequest> for ProductDraft {
    fn from(req: ProductRequest) -> Self {
        Self {
            name: req.name,
            price: req.price,
        }
    }
}

impl From<ProductRequest> for ProductPatch {
    fn from(req: ProductRequest) -> Self {
        Self {
            name: Some(req.name),
            price: Some(req.price),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductPatchRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
}

impl From<ProductPatchRequest> for ProductPatch {
    fn from(req: ProductPatchRequest) -> Self {
        Self {
            name: req.name,
            price: req.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    pub product: i64,

    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    pub quantity: i32,
}

impl From<&OrderItemRequest> for LineDraft {
    fn from(req: &OrderItemRequest) -> Self {
        Self {
            product_id: req.product,
            quantity: req.quantity,
        }
    }
}

fn lines(items: &[OrderItemRequest]) -> Vec<LineDraft> {
    items.iter().map(LineDraft::from).collect()
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderRequest {
    pub customer: i64,

    #[validate(
        length(min = 1, message = "An order must contain at least one item."),
        nested
    )]
    pub items: Vec<OrderItemRequest>,
}

impl From<OrderRequest> for OrderDraft {
    fn from(req: OrderRequest) -> Self {
        Self {
            customer_id: req.customer,
            items: lines(&req.items),
        }
    }
}

impl From<OrderRequest> for OrderChanges {
    fn from(req: OrderRequest) -> Self {
        Self {
            customer_id: Some(req.customer),
            items: Some(lines(&req.items)),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderPatchRequest {
    pub customer: Option<i64>,

    #[validate(
        length(min = 1, message = "An order must contain at least one item."),
        nested
    )]
    pub items: Option<Vec<OrderItemRequest>>,
}

impl From<OrderPatchRequest> for OrderChanges {
    fn from(req: OrderPatchRequest) -> Self {
        Self {
            customer_id: req.customer,
            items: req.items.as_deref().map(lines),
        }
    }
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

/// Query values arrive as strings so bad input becomes a field error
/// instead of a bare extractor rejection.
fn parse_page(raw: Option<&str>) -> Result<PageRequest, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(PageRequest::default()),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|page| *page >= 1)
            .map(|page| PageRequest::new(Some(page)))
            .ok_or_else(|| AppError::NotFound("Invalid page.".into())),
    }
}

fn parse_id(field: &str, raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::field(field, "Enter a whole number.")),
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Result<PageRequest, AppError> {
        parse_page(self.page.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicantListQuery {
    pub page: Option<String>,
    pub search: Option<String>,
}

impl ApplicantListQuery {
    pub fn into_parts(self) -> Result<(ApplicantFilter, PageRequest), AppError> {
        let page = parse_page(self.page.as_deref())?;
        Ok((
            ApplicantFilter {
                search: non_blank(self.search),
            },
            page,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    pub page: Option<String>,
    pub title: Option<String>,
}

impl JobListQuery {
    pub fn into_parts(self) -> Result<(JobFilter, PageRequest), AppError> {
        let page = parse_page(self.page.as_deref())?;
        Ok((
            JobFilter {
                title: non_blank(self.title),
            },
            page,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListQuery {
    pub page: Option<String>,
    pub status: Option<String>,
    pub applicant: Option<String>,
    pub job: Option<String>,
}

impl ApplicationListQuery {
    pub fn into_parts(self) -> Result<(ApplicationFilter, PageRequest), AppError> {
        let page = parse_page(self.page.as_deref())?;
        let status = non_blank(self.status)
            .as_deref()
            .map(parse_status)
            .transpose()?;

        Ok((
            ApplicationFilter {
                status,
                applicant_id: parse_id("applicant", self.applicant.as_deref())?,
                job_id: parse_id("job", self.job.as_deref())?,
            },
            page,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<String>,
    pub customer: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl OrderListQuery {
    pub fn into_parts(self) -> Result<(OrderFilter, PageRequest), AppError> {
        let page = parse_page(self.page.as_deref())?;
        Ok((
            OrderFilter {
                customer_id: parse_id("customer", self.customer.as_deref())?,
                range: DateRange::parse(self.from.as_deref(), self.to.as_deref())?,
            },
            page,
        ))
    }
}

/// `?from=&to=` on analytics endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRangeQuery {
    pub fn range(&self) -> Result<DateRange, AppError> {
        DateRange::parse(self.from.as_deref(), self.to.as_deref())
    }
}
