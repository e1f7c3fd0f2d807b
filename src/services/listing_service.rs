use crate::api::controllers::dto::category_dto::CategoryDTO;
use crate::api::controllers::dto::department_dto::DepartmentDTO;
use crate::api::controllers::dto::listing_dto::{
    ListingDTO, NewListingForm, SizeVariantInput, UpdateListingRequest,
};
use crate::data::models::department::Department;
use crate::data::models::listing::{Listing, ListingStatus, NewListing, UpdateListing};
use crate::data::models::listing_size_variant::{ListingSizeVariant, NewListingSizeVariant};
use crate::data::models::user::User;
use crate::data::repos::implementors::category_repo::CategoryRepo;
use crate::data::repos::implementors::department_repo::DepartmentRepo;
use crate::data::repos::implementors::listing_repo::ListingRepo;
use crate::data::repos::implementors::user_repo::UserRepo;
use crate::data::repos::traits::repository::Repository;
use crate::security::access::{ANY_ROLE, STAFF, SUPERADMIN_ONLY, require_department, require_role};
use crate::services::errors::ListingServiceError;
use crate::services::user_service::session;
use crate::storage::{FileStorage, UploadKind, UploadedFile};
use crate::utils::mappers::timestamp_string;
use bigdecimal::{BigDecimal, Zero};
use std::collections::{HashMap, HashSet};

const MAX_TITLE_LENGTH: usize = 255;
const MAX_SIZE_LENGTH: usize = 10;

/// Decodes the `size_variants` JSON form field. Entries without positive
/// stock are dropped; a size may appear only once.
pub fn parse_size_variants(raw: Option<&str>) -> Result<Vec<SizeVariantInput>, ListingServiceError> {
    let raw = match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => raw,
        None => return Ok(Vec::new()),
    };

    let parsed: Vec<SizeVariantInput> = serde_json::from_str(raw).map_err(|_| {
        ListingServiceError::Validation("The size variants must be a valid JSON array.".into())
    })?;

    normalize_variants(parsed)
}

pub fn normalize_variants(
    variants: Vec<SizeVariantInput>,
) -> Result<Vec<SizeVariantInput>, ListingServiceError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(variants.len());

    for variant in variants {
        let size = variant.size.trim();
        if size.is_empty() || variant.stock_quantity <= 0 {
            continue;
        }
        if size.chars().count() > MAX_SIZE_LENGTH {
            return Err(ListingServiceError::Validation(
                "The size may not be greater than 10 characters.".into(),
            ));
        }
        if !seen.insert(size.to_uppercase()) {
            return Err(ListingServiceError::Validation(format!("Duplicate size {size}.")));
        }
        out.push(SizeVariantInput {
            size: size.to_string(),
            stock_quantity: variant.stock_quantity,
        });
    }

    Ok(out)
}

/// Department a new listing goes to: the user's own by default, any
/// requested one for superadmins, a requested one they manage for admins.
pub fn resolve_department(user: &User, requested: Option<i32>) -> Result<i32, ListingServiceError> {
    let resolved = match requested {
        Some(dept) if user.is_superadmin() => Some(dept),
        Some(dept) if user.is_admin() => {
            require_department(user, dept, "create listings")?;
            Some(dept)
        }
        _ => user.department_id,
    };

    resolved.ok_or_else(|| ListingServiceError::Validation("The department id field is required.".into()))
}

/// Sum of variant stock, or the listing's own stock when it has no variants.
pub fn total_stock(listing: &Listing, variants: &[ListingSizeVariant]) -> i32 {
    if variants.is_empty() {
        listing.stock_quantity
    } else {
        variants.iter().map(|v| v.stock_quantity).sum()
    }
}

fn validate_title(title: &str) -> Result<(), ListingServiceError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ListingServiceError::Validation("The title field is required.".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ListingServiceError::Validation(
            "The title may not be greater than 255 characters.".into(),
        ));
    }
    Ok(())
}

fn validate_price(price: &BigDecimal) -> Result<(), ListingServiceError> {
    if *price < BigDecimal::zero() {
        return Err(ListingServiceError::Validation("The price must be at least 0.".into()));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<(), ListingServiceError> {
    if stock < 0 {
        return Err(ListingServiceError::Validation(
            "The stock quantity must be at least 0.".into(),
        ));
    }
    Ok(())
}

pub struct ListingService {
    storage: FileStorage,
}

impl ListingService {
    pub fn new() -> Self {
        Self::with_storage(FileStorage::new())
    }

    pub fn with_storage(storage: FileStorage) -> Self {
        ListingService { storage }
    }

    async fn find(&self, id: i32) -> Result<Listing, ListingServiceError> {
        ListingRepo::new()
            .get_by_id(id)
            .await?
            .ok_or(ListingServiceError::ListingNotFound)
    }

    pub async fn get(&self, id: i32) -> Result<Listing, ListingServiceError> {
        self.find(id).await
    }

    /// Loads the related rows for every listing and builds the payloads.
    pub async fn present(&self, listings: Vec<Listing>) -> Result<Vec<ListingDTO>, ListingServiceError> {
        if listings.is_empty() {
            return Ok(Vec::new());
        }

        let listing_repo = ListingRepo::new();
        let ids: Vec<i32> = listings.iter().map(|l| l.listing_id).collect();
        let user_ids: Vec<i32> = listings
            .iter()
            .map(|l| l.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let mut variants: HashMap<i32, Vec<ListingSizeVariant>> = HashMap::new();
        for variant in listing_repo.get_variants_for(&ids).await? {
            variants.entry(variant.listing_id).or_default().push(variant);
        }
        let mut images = HashMap::new();
        for image in listing_repo.get_images_for(&ids).await? {
            images.entry(image.listing_id).or_insert_with(Vec::new).push(image);
        }

        let categories: HashMap<i32, CategoryDTO> = CategoryRepo::new()
            .get_all()
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|c| (c.category_id, c.into()))
            .collect();
        let departments: HashMap<i32, Department> = DepartmentRepo::new()
            .get_all()
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|d| (d.department_id, d))
            .collect();
        let users: HashMap<i32, User> = UserRepo::new()
            .get_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.user_id, u))
            .collect();

        Ok(listings
            .into_iter()
            .map(|listing| {
                let listing_variants = variants.remove(&listing.listing_id).unwrap_or_default();
                let stock = total_stock(&listing, &listing_variants);
                let user = users.get(&listing.user_id).map(|u| {
                    let name = u
                        .department_id
                        .and_then(|id| departments.get(&id))
                        .map(|d| d.name.clone());
                    session(u, name)
                });

                ListingDTO {
                    id: listing.listing_id,
                    title: listing.title,
                    description: listing.description,
                    image_path: listing.image_path,
                    price: listing.price,
                    size: listing.size,
                    status: listing.status,
                    stock_quantity: listing.stock_quantity,
                    department_id: listing.department_id,
                    category_id: listing.category_id,
                    user_id: listing.user_id,
                    category: categories.get(&listing.category_id).cloned(),
                    user,
                    department: departments
                        .get(&listing.department_id)
                        .cloned()
                        .map(DepartmentDTO::from),
                    has_multiple_sizes: listing_variants.len() > 1,
                    size_variants: listing_variants.into_iter().map(Into::into).collect(),
                    images: images
                        .remove(&listing.listing_id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(Into::into)
                        .collect(),
                    total_stock: stock,
                    created_at: timestamp_string(listing.created_at),
                    updated_at: timestamp_string(listing.updated_at),
                }
            })
            .collect())
    }

    pub async fn present_one(&self, listing: Listing) -> Result<ListingDTO, ListingServiceError> {
        self.present(vec![listing])
            .await?
            .pop()
            .ok_or(ListingServiceError::ListingNotFound)
    }

    pub async fn create(
        &self,
        actor: &User,
        form: NewListingForm,
        image: Option<UploadedFile>,
    ) -> Result<Listing, ListingServiceError> {
        require_role(actor, ANY_ROLE)?;
        validate_title(&form.title)?;
        validate_price(&form.price)?;
        validate_stock(form.stock_quantity)?;
        if form
            .size
            .as_deref()
            .is_some_and(|s| s.trim().chars().count() > MAX_SIZE_LENGTH)
        {
            return Err(ListingServiceError::Validation(
                "The size may not be greater than 10 characters.".into(),
            ));
        }

        CategoryRepo::new()
            .get_by_id(form.category_id)
            .await?
            .ok_or(ListingServiceError::CategoryNotFound)?;

        if let Some(requested) = form.department_id {
            DepartmentRepo::new()
                .get_by_id(requested)
                .await?
                .ok_or(ListingServiceError::DepartmentNotFound)?;
        }
        let department_id = resolve_department(actor, form.department_id)?;
        let department = DepartmentRepo::new()
            .get_by_id(department_id)
            .await?
            .ok_or(ListingServiceError::DepartmentNotFound)?;
        if department.is_official_merch() && !actor.is_superadmin() {
            tracing::warn!(user_id = actor.user_id, "official merch listing refused");
            return Err(ListingServiceError::OfficialMerchRestricted);
        }

        let status = match form.status {
            Some(status) if actor.is_superadmin() => status,
            _ => ListingStatus::Pending,
        };
        let variants = normalize_variants(form.size_variants)?;

        let image_path = match &image {
            Some(file) => Some(self.storage.store(file, UploadKind::ListingImage).await?),
            None => None,
        };

        let created = ListingRepo::new()
            .create(
                NewListing {
                    title: form.title.trim(),
                    description: form.description.as_deref().map(str::trim).filter(|d| !d.is_empty()),
                    image_path: image_path.as_deref(),
                    department_id,
                    category_id: form.category_id,
                    user_id: actor.user_id,
                    price: form.price.clone(),
                    size: form.size.as_deref().map(str::trim).filter(|s| !s.is_empty()),
                    status,
                    stock_quantity: form.stock_quantity,
                },
                variants
                    .into_iter()
                    .map(|v| (v.size, v.stock_quantity))
                    .collect(),
            )
            .await;

        match created {
            Ok(listing) => {
                tracing::info!(
                    listing_id = listing.listing_id,
                    user_id = actor.user_id,
                    department_id,
                    status = status.as_str(),
                    "listing created"
                );
                Ok(listing)
            }
            Err(e) => {
                if let Some(path) = &image_path {
                    self.storage.remove(path).await;
                }
                Err(e.into())
            }
        }
    }

    /// Approved listings, newest first.
    pub async fn approved(&self) -> Result<Vec<Listing>, ListingServiceError> {
        Ok(ListingRepo::new().get_by_status(ListingStatus::Approved).await?)
    }

    pub async fn for_user(&self, user: &User) -> Result<Vec<Listing>, ListingServiceError> {
        Ok(ListingRepo::new().get_by_user(user.user_id).await?)
    }

    /// Moderation queue: the admin's department, or everything for superadmins.
    pub async fn for_moderation(&self, actor: &User) -> Result<Vec<Listing>, ListingServiceError> {
        require_role(actor, STAFF)?;
        let repo = ListingRepo::new();

        if actor.is_superadmin() {
            return Ok(repo.get_all().await?.unwrap_or_default());
        }

        match actor.department_id {
            Some(dept) => Ok(repo.get_by_department(dept).await?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn all(&self, actor: &User) -> Result<Vec<Listing>, ListingServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        Ok(ListingRepo::new().get_all().await?.unwrap_or_default())
    }

    pub async fn for_department(&self, actor: &User, department_id: i32) -> Result<Vec<Listing>, ListingServiceError> {
        require_department(actor, department_id, "view department listings")?;
        Ok(ListingRepo::new().get_by_department(department_id).await?)
    }

    pub async fn set_status(
        &self,
        actor: &User,
        id: i32,
        status: ListingStatus,
    ) -> Result<Listing, ListingServiceError> {
        require_role(actor, STAFF)?;
        let listing = self.find(id).await?;
        require_department(actor, listing.department_id, "moderate listings")?;

        ListingRepo::new().set_status(id, status).await?;
        tracing::info!(listing_id = id, actor = actor.user_id, status = status.as_str(), "listing moderated");

        self.find(id).await
    }

    pub async fn approve(&self, actor: &User, id: i32) -> Result<Listing, ListingServiceError> {
        self.set_status(actor, id, ListingStatus::Approved).await
    }

    pub async fn reject(&self, actor: &User, id: i32) -> Result<Listing, ListingServiceError> {
        self.set_status(actor, id, ListingStatus::Rejected).await
    }

    pub async fn update(
        &self,
        actor: &User,
        id: i32,
        req: UpdateListingRequest,
    ) -> Result<Listing, ListingServiceError> {
        require_role(actor, STAFF)?;
        let listing = self.find(id).await?;
        require_department(actor, listing.department_id, "update listings")?;

        validate_title(&req.title)?;
        validate_price(&req.price)?;
        if let Some(stock) = req.stock_quantity {
            validate_stock(stock)?;
        }

        let form = UpdateListing {
            title: Some(req.title.trim()),
            description: Some(req.description.as_deref().map(str::trim).filter(|d| !d.is_empty())),
            price: Some(req.price.clone()),
            stock_quantity: req.stock_quantity,
            status: req.status.filter(|_| actor.is_superadmin()),
            ..Default::default()
        };

        ListingRepo::new().update(id, form).await?;
        tracing::info!(listing_id = id, actor = actor.user_id, "listing updated");

        self.find(id).await
    }

    pub async fn replace_variants(
        &self,
        actor: &User,
        id: i32,
        variants: Vec<SizeVariantInput>,
    ) -> Result<Vec<ListingSizeVariant>, ListingServiceError> {
        require_role(actor, STAFF)?;
        let listing = self.find(id).await?;
        require_department(actor, listing.department_id, "update size variants")?;

        let rows = normalize_variants(variants)?
            .into_iter()
            .map(|v| NewListingSizeVariant {
                listing_id: id,
                size: v.size,
                stock_quantity: v.stock_quantity,
            })
            .collect();

        let stored = ListingRepo::new().replace_variants(id, rows).await?;
        tracing::info!(listing_id = id, variants = stored.len(), "size variants replaced");

        Ok(stored)
    }

    pub async fn update_stock(&self, actor: &User, id: i32, stock: i32) -> Result<Listing, ListingServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        validate_stock(stock)?;
        self.find(id).await?;

        ListingRepo::new()
            .update(
                id,
                UpdateListing {
                    stock_quantity: Some(stock),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(listing_id = id, stock, "listing stock set");

        self.find(id).await
    }

    pub async fn delete(&self, actor: &User, id: i32) -> Result<(), ListingServiceError> {
        require_role(actor, STAFF)?;
        let listing = self.find(id).await?;
        require_department(actor, listing.department_id, "delete listings")?;

        let repo = ListingRepo::new();
        let images = repo.get_images_for(&[id]).await?;
        repo.delete(id).await?;

        let mut paths: HashSet<String> = images.into_iter().map(|i| i.image_path).collect();
        paths.extend(listing.image_path);
        for path in paths {
            self.storage.remove(&path).await;
        }

        tracing::info!(listing_id = id, actor = actor.user_id, "listing deleted");
        Ok(())
    }
}

impl Default for ListingService {
    fn default() -> Self {
        Self::new()
    }
}
