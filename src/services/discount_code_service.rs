use crate::api::controllers::dto::discount_code_dto::{
    DepartmentCodeCountDTO, DiscountCodeRequest, DiscountStatsDTO,
};
use crate::data::models::discount_code::{
    DiscountCode, DiscountRejection, DiscountType, NewDiscountCode, UpdateDiscountCode,
};
use crate::data::models::user::User;
use crate::data::repos::implementors::department_repo::DepartmentRepo;
use crate::data::repos::implementors::discount_code_repo::DiscountCodeRepo;
use crate::data::repos::traits::repository::Repository;
use crate::security::access::{STAFF, SUPERADMIN_ONLY, require_role};
use crate::security::errors::AccessDenied;
use crate::services::errors::{DiscountCodeServiceError, is_unique_violation};
use crate::services::pricing::Breakdown;
use crate::utils::money::round2;
use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::BTreeMap;

const MAX_CODE_LENGTH: usize = 50;
const MAX_DESCRIPTION_LENGTH: usize = 500;
const MAX_PREFIX_LENGTH: usize = 10;
const DEFAULT_GENERATED_LENGTH: usize = 8;
const GENERATE_ATTEMPTS: usize = 20;

fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Status filter of the admin listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFilter {
    Active,
    Valid,
}

impl CodeFilter {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            Some("active") => Some(CodeFilter::Active),
            Some("valid") => Some(CodeFilter::Valid),
            _ => None,
        }
    }
}

/// Form checks shared by create and update.
pub fn validate_request(req: &DiscountCodeRequest) -> Result<(), DiscountCodeServiceError> {
    let code = req.code.trim();
    if code.is_empty() {
        return Err(DiscountCodeServiceError::Validation("The code field is required.".into()));
    }
    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(DiscountCodeServiceError::Validation(
            "The code may not be greater than 50 characters.".into(),
        ));
    }
    if req.discount_type != DiscountType::Percentage {
        return Err(DiscountCodeServiceError::Validation("The selected type is invalid.".into()));
    }
    if req.value < BigDecimal::zero() {
        return Err(DiscountCodeServiceError::Validation("The value must be at least 0.".into()));
    }
    if req.value > BigDecimal::from(100) {
        return Err(DiscountCodeServiceError::Validation(
            "Percentage discount cannot exceed 100%".into(),
        ));
    }
    if req
        .description
        .as_deref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LENGTH)
    {
        return Err(DiscountCodeServiceError::Validation(
            "The description may not be greater than 500 characters.".into(),
        ));
    }
    if req.usage_limit.is_some_and(|limit| limit < 1) {
        return Err(DiscountCodeServiceError::Validation(
            "The usage limit must be at least 1.".into(),
        ));
    }
    if req
        .minimum_order_amount
        .as_ref()
        .is_some_and(|m| *m < BigDecimal::zero())
    {
        return Err(DiscountCodeServiceError::Validation(
            "The minimum order amount must be at least 0.".into(),
        ));
    }
    if let (Some(from), Some(until)) = (req.valid_from, req.valid_until) {
        if until <= from {
            return Err(DiscountCodeServiceError::Validation(
                "The valid until must be a date after valid from.".into(),
            ));
        }
    }
    Ok(())
}

/// Department the code ends up scoped to. Admins are pinned to their own
/// department and may not mint UDD official codes; official codes are
/// department-less.
pub fn resolve_scope(
    actor: &User,
    department_id: Option<i32>,
    is_udd_official: bool,
) -> Result<Option<i32>, DiscountCodeServiceError> {
    if actor.is_admin() {
        if is_udd_official {
            return Err(AccessDenied::Department {
                department_id: department_id.unwrap_or_default(),
                action: "manage UDD official discount codes".into(),
            }
            .into());
        }
        if department_id.is_some_and(|dept| Some(dept) != actor.department_id) {
            return Err(AccessDenied::Department {
                department_id: department_id.unwrap_or_default(),
                action: "manage discount codes".into(),
            }
            .into());
        }
        return Ok(actor.department_id);
    }

    if is_udd_official {
        return Ok(None);
    }

    Ok(department_id)
}

/// Random uppercase code starting with `prefix`.
pub fn random_code(prefix: &str, length: usize) -> Result<String, DiscountCodeServiceError> {
    let prefix = prefix.trim().to_uppercase();
    if prefix.chars().count() > MAX_PREFIX_LENGTH {
        return Err(DiscountCodeServiceError::Validation(
            "The prefix may not be greater than 10 characters.".into(),
        ));
    }
    if !(4..=20).contains(&length) {
        return Err(DiscountCodeServiceError::Validation(
            "The length must be between 4 and 20.".into(),
        ));
    }
    let random_len = length.saturating_sub(prefix.chars().count());
    if random_len == 0 {
        return Err(DiscountCodeServiceError::Validation(
            "The length must be greater than the prefix length.".into(),
        ));
    }

    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(random_len)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();

    Ok(format!("{prefix}{suffix}"))
}

pub fn stats_for(codes: &[DiscountCode], now: NaiveDateTime) -> DiscountStatsDTO {
    DiscountStatsDTO {
        total_codes: codes.len(),
        active_codes: codes.iter().filter(|c| c.is_active).count(),
        expired_codes: codes.iter().filter(|c| c.is_expired(now)).count(),
        used_codes: codes.iter().filter(|c| c.usage_count > 0).count(),
        total_usage: codes.iter().map(|c| i64::from(c.usage_count)).sum(),
        by_department: None,
        udd_official_codes: None,
    }
}

pub struct DiscountCodeService;

impl DiscountCodeService {
    pub fn new() -> Self {
        DiscountCodeService
    }

    async fn find(&self, id: i32) -> Result<DiscountCode, DiscountCodeServiceError> {
        DiscountCodeRepo::new()
            .get_by_id(id)
            .await?
            .ok_or(DiscountCodeServiceError::DiscountCodeNotFound)
    }

    async fn ensure_department(&self, department_id: Option<i32>) -> Result<(), DiscountCodeServiceError> {
        if let Some(id) = department_id {
            DepartmentRepo::new()
                .get_by_id(id)
                .await?
                .ok_or_else(|| DiscountCodeServiceError::Validation("The selected department is invalid.".into()))?;
        }
        Ok(())
    }

    async fn ensure_code_free(&self, code: &str, except: Option<i32>) -> Result<(), DiscountCodeServiceError> {
        match DiscountCodeRepo::new().get_by_code(code).await? {
            Some(existing) if Some(existing.discount_code_id) != except => {
                Err(DiscountCodeServiceError::CodeTaken)
            }
            _ => Ok(()),
        }
    }

    fn map_write_error(e: diesel::result::Error) -> DiscountCodeServiceError {
        if is_unique_violation(&e) {
            DiscountCodeServiceError::CodeTaken
        } else {
            DiscountCodeServiceError::Database(e)
        }
    }

    /// Codes visible to `actor`, newest first.
    pub async fn list(
        &self,
        actor: &User,
        filter: Option<CodeFilter>,
        department_id: Option<i32>,
    ) -> Result<Vec<DiscountCode>, DiscountCodeServiceError> {
        require_role(actor, STAFF)?;
        let now = now();

        Ok(DiscountCodeRepo::new()
            .list()
            .await?
            .into_iter()
            .filter(|c| c.is_visible_to(actor))
            .filter(|c| match filter {
                Some(CodeFilter::Active) => c.is_active,
                Some(CodeFilter::Valid) => c.is_valid(now),
                None => true,
            })
            .filter(|c| {
                !actor.is_superadmin() || department_id.is_none() || c.department_id == department_id
            })
            .collect())
    }

    pub async fn list_all(&self, actor: &User) -> Result<Vec<DiscountCode>, DiscountCodeServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        Ok(DiscountCodeRepo::new().list().await?)
    }

    pub async fn get(&self, actor: &User, id: i32) -> Result<DiscountCode, DiscountCodeServiceError> {
        require_role(actor, STAFF)?;
        let code = self.find(id).await?;
        if !code.can_be_edited_by(actor) {
            return Err(AccessDenied::Role(SUPERADMIN_ONLY.to_vec()).into());
        }
        Ok(code)
    }

    pub async fn create(
        &self,
        actor: &User,
        req: DiscountCodeRequest,
    ) -> Result<DiscountCode, DiscountCodeServiceError> {
        require_role(actor, STAFF)?;
        validate_request(&req)?;
        if req.valid_from.is_some_and(|from| from.date() < now().date()) {
            return Err(DiscountCodeServiceError::Validation(
                "The valid from must be a date after or equal to today.".into(),
            ));
        }

        let department_id = resolve_scope(actor, req.department_id, req.is_udd_official)?;
        if !DiscountCode::can_be_created_by(actor, department_id) {
            return Err(AccessDenied::Role(SUPERADMIN_ONLY.to_vec()).into());
        }
        self.ensure_department(department_id).await?;

        let code = req.code.trim().to_uppercase();
        self.ensure_code_free(&code, None).await?;

        let created = DiscountCodeRepo::new()
            .create(NewDiscountCode {
                code: &code,
                discount_type: req.discount_type,
                value: round2(&req.value),
                description: req.description.as_deref().map(str::trim).filter(|d| !d.is_empty()),
                created_by: actor.user_id,
                department_id,
                is_udd_official: req.is_udd_official && actor.is_superadmin(),
                usage_limit: req.usage_limit,
                minimum_order_amount: req.minimum_order_amount.as_ref().map(round2),
                valid_from: req.valid_from,
                valid_until: req.valid_until,
                is_active: true,
            })
            .await
            .map_err(Self::map_write_error)?;

        tracing::info!(code = %created.code, actor = actor.user_id, department_id = ?created.department_id, "discount code created");
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &User,
        id: i32,
        req: DiscountCodeRequest,
    ) -> Result<DiscountCode, DiscountCodeServiceError> {
        require_role(actor, STAFF)?;
        let current = self.find(id).await?;
        if !current.can_be_edited_by(actor) {
            return Err(AccessDenied::Department {
                department_id: current.department_id.unwrap_or_default(),
                action: "edit discount code".into(),
            }
            .into());
        }
        validate_request(&req)?;

        let department_id = resolve_scope(actor, req.department_id, req.is_udd_official)?;
        self.ensure_department(department_id).await?;

        let code = req.code.trim().to_uppercase();
        self.ensure_code_free(&code, Some(id)).await?;

        DiscountCodeRepo::new()
            .update(
                id,
                UpdateDiscountCode {
                    code: Some(&code),
                    discount_type: Some(req.discount_type),
                    value: Some(round2(&req.value)),
                    description: Some(req.description.as_deref().map(str::trim).filter(|d| !d.is_empty())),
                    department_id: Some(department_id),
                    is_udd_official: actor.is_superadmin().then_some(req.is_udd_official),
                    usage_limit: Some(req.usage_limit),
                    minimum_order_amount: Some(req.minimum_order_amount.as_ref().map(round2)),
                    valid_from: Some(req.valid_from),
                    valid_until: Some(req.valid_until),
                    is_active: req.is_active,
                },
            )
            .await
            .map_err(Self::map_write_error)?;

        tracing::info!(code = %code, actor = actor.user_id, "discount code updated");
        self.find(id).await
    }

    /// Used codes are kept for order history.
    pub async fn delete(&self, actor: &User, id: i32) -> Result<(), DiscountCodeServiceError> {
        require_role(actor, STAFF)?;
        let current = self.find(id).await?;
        if !current.can_be_edited_by(actor) {
            return Err(AccessDenied::Department {
                department_id: current.department_id.unwrap_or_default(),
                action: "delete discount code".into(),
            }
            .into());
        }
        if current.usage_count > 0 {
            return Err(DiscountCodeServiceError::AlreadyUsed);
        }

        DiscountCodeRepo::new().delete(id).await?;
        tracing::info!(code = %current.code, actor = actor.user_id, "discount code deleted");
        Ok(())
    }

    pub async fn stats(&self, actor: &User) -> Result<DiscountStatsDTO, DiscountCodeServiceError> {
        require_role(actor, STAFF)?;
        let all = DiscountCodeRepo::new().list().await?;
        let visible: Vec<DiscountCode> = all.iter().filter(|c| c.is_visible_to(actor)).cloned().collect();

        let mut stats = stats_for(&visible, now());

        if actor.is_superadmin() {
            let names: BTreeMap<i32, String> = DepartmentRepo::new()
                .get_all()
                .await?
                .unwrap_or_default()
                .into_iter()
                .map(|d| (d.department_id, d.name))
                .collect();

            let mut counts: BTreeMap<i32, i64> = BTreeMap::new();
            for dept in all.iter().filter_map(|c| c.department_id) {
                *counts.entry(dept).or_default() += 1;
            }

            stats.by_department = Some(
                counts
                    .into_iter()
                    .map(|(department_id, count)| DepartmentCodeCountDTO {
                        department_id,
                        department_name: names.get(&department_id).cloned(),
                        count,
                    })
                    .collect(),
            );
            stats.udd_official_codes = Some(all.iter().filter(|c| c.is_udd_official).count());
        }

        Ok(stats)
    }

    /// A random code not yet in use.
    pub async fn generate(
        &self,
        actor: &User,
        prefix: Option<&str>,
        length: Option<usize>,
    ) -> Result<String, DiscountCodeServiceError> {
        require_role(actor, STAFF)?;
        let repo = DiscountCodeRepo::new();
        let length = length.unwrap_or(DEFAULT_GENERATED_LENGTH);

        for _ in 0..GENERATE_ATTEMPTS {
            let candidate = random_code(prefix.unwrap_or_default(), length)?;
            if repo.get_by_code(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }

        Err(DiscountCodeServiceError::Validation(
            "Could not generate a unique code; try a longer length.".into(),
        ))
    }

    /// Looks the code up and checks it against an order. Unknown or invalid
    /// codes are `InvalidCode`; codes that exist but do not fit are `Rejected`.
    pub async fn validate(
        &self,
        code: &str,
        order_amount: &BigDecimal,
        department_id: i32,
    ) -> Result<(DiscountCode, Breakdown), DiscountCodeServiceError> {
        if *order_amount < BigDecimal::zero() {
            return Err(DiscountCodeServiceError::Validation(
                "The order amount must be at least 0.".into(),
            ));
        }
        DepartmentRepo::new()
            .get_by_id(department_id)
            .await?
            .ok_or_else(|| DiscountCodeServiceError::Validation("The selected department is invalid.".into()))?;

        let now = now();
        let found = DiscountCodeRepo::new()
            .get_by_code(code)
            .await?
            .filter(|c| c.is_valid(now))
            .ok_or(DiscountCodeServiceError::InvalidCode)?;

        match found.check_order(order_amount, department_id, now) {
            Ok(()) => {
                let totals = Breakdown::new(order_amount, &found.calculate_discount(order_amount));
                Ok((found, totals))
            }
            Err(DiscountRejection::Invalid) => Err(DiscountCodeServiceError::InvalidCode),
            Err(rejection) => Err(rejection.into()),
        }
    }

    /// Full price breakdown; a missing code means no discount.
    pub async fn calculate(
        &self,
        code: Option<&str>,
        order_amount: &BigDecimal,
        department_id: i32,
    ) -> Result<Breakdown, DiscountCodeServiceError> {
        match code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Ok(self.validate(code, order_amount, department_id).await?.1),
            None => {
                if *order_amount < BigDecimal::zero() {
                    return Err(DiscountCodeServiceError::Validation(
                        "The order amount must be at least 0.".into(),
                    ));
                }
                Ok(Breakdown::new(order_amount, &BigDecimal::zero()))
            }
        }
    }
}

impl Default for DiscountCodeService {
    fn default() -> Self {
        Self::new()
    }
}
