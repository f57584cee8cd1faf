//! LearnHub client library
//!
//! Client-side state and orchestration for the LearnHub student portal:
//! typed bindings to the platform REST API, the coupon and payment services,
//! and the view-state components backing the course detail and purchased
//! course screens. Rendering is out of scope; views expose state and emit
//! [`events::UiEvent`]s for a rendering shell to consume.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod models;
pub mod services;
pub mod text;
pub mod views;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{CredentialStore, IdentityProvider};
use crate::config::AppConfig;
use crate::errors::ClientError;
use crate::events::UiEventSender;
use crate::gateway::PaymentGateway;
use crate::services::{CouponService, CourseService, PaymentService};
use crate::views::{CourseDetailView, MyCoursesView};

/// Composition root wiring configuration, the API client, the per-concern
/// services and the injected capabilities (credential store, payment
/// gateway, UI event sink) into ready-to-mount views.
#[derive(Clone)]
pub struct Portal {
    config: AppConfig,
    courses: CourseService,
    coupons: CouponService,
    payments: PaymentService,
    gateway: Arc<dyn PaymentGateway>,
    identity: IdentityProvider,
    events: UiEventSender,
}

impl Portal {
    pub fn new(
        config: AppConfig,
        credentials: Arc<dyn CredentialStore>,
        gateway: Arc<dyn PaymentGateway>,
        events: UiEventSender,
    ) -> Result<Self, ClientError> {
        let api = Arc::new(ApiClient::from_config(&config)?);
        let identity = IdentityProvider::new(credentials, config.auth_cookie_name.clone());

        Ok(Self {
            courses: CourseService::new(Arc::clone(&api)),
            coupons: CouponService::new(Arc::clone(&api)),
            payments: PaymentService::new(api),
            gateway,
            identity,
            events,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn courses(&self) -> &CourseService {
        &self.courses
    }

    pub fn coupons(&self) -> &CouponService {
        &self.coupons
    }

    pub fn identity(&self) -> &IdentityProvider {
        &self.identity
    }

    /// Builds the course detail view for `course_id`. The view is created in
    /// the loading state; call [`CourseDetailView::load`] to fetch the course.
    pub fn course_detail(&self, course_id: impl Into<String>) -> Result<CourseDetailView, ClientError> {
        let user_id = self.identity.resolve()?;
        Ok(CourseDetailView::new(
            course_id.into(),
            user_id,
            self.courses.clone(),
            self.coupons.clone(),
            self.payments.clone(),
            Arc::clone(&self.gateway),
            self.events.clone(),
            self.config.clone(),
        ))
    }

    /// Builds the purchased courses listing view for the signed-in user.
    pub fn my_courses(&self) -> Result<MyCoursesView, ClientError> {
        let user_id = self.identity.resolve()?;
        Ok(MyCoursesView::new(
            self.courses.clone(),
            user_id,
            self.config.items_per_page,
        ))
    }
}
