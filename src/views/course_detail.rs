use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::auth::UserId;
use crate::config::{AppConfig, FeedbackPolicy};
use crate::errors::ClientError;
use crate::events::{DialogAction, UiEvent, UiEventSender};
use crate::gateway::{CheckoutRequest, PaymentGateway};
use crate::models::{Course, Discount};
use crate::services::{CouponService, CourseService, PaymentService};
use crate::views::LoadState;

/// How long the celebratory effect stays visible after a successful coupon
/// application.
pub const CELEBRATION_MILLIS: u64 = 3_000;

/// Payment orchestration states.
///
/// One attempt walks `Idle → OrderPending → AwaitingGateway → VerifyPending`
/// and ends in `Succeeded` or `Failed`. An abandoned checkout parks the
/// attempt in `AwaitingGateway` until the view unmounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPhase {
    Idle,
    OrderPending,
    AwaitingGateway,
    VerifyPending,
    Succeeded,
    Failed,
}

/// How a payment attempt ended. Remote failures are handled here (logged
/// and surfaced through events) rather than propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Completed { redirect: String },
    AlreadyOwned,
    OrderFailed,
    GatewayFailed,
    Abandoned,
    VerificationFailed,
}

/// State behind the course detail/purchase screen: the fetched course, the
/// coupon input and active discount, and the payment orchestration.
pub struct CourseDetailView {
    course_id: String,
    user_id: UserId,
    courses: CourseService,
    coupons: CouponService,
    payments: PaymentService,
    gateway: Arc<dyn PaymentGateway>,
    events: UiEventSender,
    config: AppConfig,
    state: LoadState,
    course: Option<Course>,
    coupon_code: String,
    discount: Option<Discount>,
    phase: PaymentPhase,
    celebration: Celebration,
}

impl CourseDetailView {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        course_id: String,
        user_id: UserId,
        courses: CourseService,
        coupons: CouponService,
        payments: PaymentService,
        gateway: Arc<dyn PaymentGateway>,
        events: UiEventSender,
        config: AppConfig,
    ) -> Self {
        Self {
            course_id,
            user_id,
            courses,
            coupons,
            payments,
            gateway,
            events,
            config,
            state: LoadState::Loading,
            course: None,
            coupon_code: String::new(),
            discount: None,
            phase: PaymentPhase::Idle,
            celebration: Celebration::default(),
        }
    }

    /// Fetches the course. Runs once per mount: the state leaves `Loading`
    /// exactly once, for `Ready` or the terminal `Failed`.
    #[instrument(skip(self), fields(course_id = %self.course_id))]
    pub async fn load(&mut self) {
        if self.state != LoadState::Loading {
            debug!("load called after mount completed; ignoring");
            return;
        }

        match self.courses.course_detail(&self.course_id).await {
            Ok(course) => {
                self.course = Some(course);
                self.state = LoadState::Ready;
            }
            Err(err) => {
                error!(error = %err, "failed to load course");
                self.state = LoadState::Failed;
            }
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn discount(&self) -> Option<&Discount> {
        self.discount.as_ref()
    }

    pub fn coupon_code(&self) -> &str {
        &self.coupon_code
    }

    pub fn set_coupon_code(&mut self, code: impl Into<String>) {
        self.coupon_code = code.into();
    }

    /// The price a payment attempt will charge: the active discount if one
    /// is stored, else the course's base price.
    pub fn effective_price(&self) -> Option<i64> {
        let course = self.course.as_ref()?;
        Some(self.discount.as_ref().map_or(course.price, |d| d.discount))
    }

    pub fn phase(&self) -> PaymentPhase {
        self.phase
    }

    /// True exactly while a payment attempt is outstanding; the shell
    /// renders the pay button as "Please wait..." and refuses clicks.
    pub fn pay_disabled(&self) -> bool {
        !matches!(self.phase, PaymentPhase::Idle | PaymentPhase::Failed)
    }

    /// True while the celebratory effect should be visible.
    pub fn celebration_active(&self) -> bool {
        self.celebration.is_active()
    }

    /// Sends the typed coupon code to the coupon service.
    ///
    /// Success stores the discount, clears the input and starts the
    /// celebration; rejection surfaces the service's message and leaves any
    /// prior discount untouched.
    #[instrument(skip(self), fields(course_id = %self.course_id))]
    pub async fn apply_coupon(&mut self) -> Result<(), ClientError> {
        let price = match (self.state, self.course.as_ref()) {
            (LoadState::Ready, Some(course)) => course.price,
            _ => return Err(ClientError::InvalidInput("course is not loaded".into())),
        };

        let code = self.coupon_code.trim().to_string();
        if code.is_empty() {
            return Err(ClientError::InvalidInput("enter a coupon code".into()));
        }

        match self.coupons.apply(&code, price).await {
            Ok(discount) => {
                info!(discounted = discount.discount, "coupon applied");
                self.coupon_code.clear();
                self.discount = Some(discount);
                self.events.toast_success("Discount applied successfully!").await;
                self.events.send(UiEvent::CelebrationStarted).await;
                self.celebration.start(self.events.clone());
            }
            Err(ClientError::CouponRejected(message)) => {
                warn!(message = %message, "coupon rejected");
                self.events.toast_error(message).await;
            }
            Err(err) => {
                error!(error = %err, "coupon application failed");
                self.events.toast_error(err.user_message()).await;
            }
        }

        Ok(())
    }

    /// Runs one payment attempt end to end: order creation, the gateway
    /// checkout, and verification, strictly in that order.
    ///
    /// Remote failures are consumed here and reported through events and the
    /// returned [`PaymentOutcome`]; `Err` is reserved for calling this on an
    /// unloaded view or while an attempt is already outstanding.
    #[instrument(skip(self), fields(course_id = %self.course_id))]
    pub async fn pay(&mut self) -> Result<PaymentOutcome, ClientError> {
        if self.pay_disabled() {
            return Err(ClientError::InvalidInput(
                "a payment attempt is already in progress".into(),
            ));
        }

        let (course_id, amount) = match (self.state, self.course.as_ref()) {
            (LoadState::Ready, Some(course)) => (
                course.id.clone(),
                self.discount.as_ref().map_or(course.price, |d| d.discount),
            ),
            _ => return Err(ClientError::InvalidInput("course is not loaded".into())),
        };

        self.phase = PaymentPhase::OrderPending;
        let order = match self
            .payments
            .create_order(amount, &self.user_id, &course_id)
            .await
        {
            Ok(order) => order,
            Err(ClientError::AlreadyPurchased) => {
                self.phase = PaymentPhase::Failed;
                self.events
                    .send(UiEvent::Dialog {
                        title: "Course already purchased".into(),
                        body: "Please visit the My Courses section to see the course.".into(),
                        action: DialogAction::GoToMyCourses,
                    })
                    .await;
                return Ok(PaymentOutcome::AlreadyOwned);
            }
            Err(err) => {
                self.phase = PaymentPhase::Failed;
                error!(error = %err, "payment order creation failed");
                self.events.toast_error(err.user_message()).await;
                return Ok(PaymentOutcome::OrderFailed);
            }
        };

        self.phase = PaymentPhase::AwaitingGateway;
        let request = CheckoutRequest::for_order(&self.config, &order);
        let proof = match self.gateway.open_checkout(request).await {
            Ok(proof) => proof,
            Err(ClientError::CheckoutAbandoned) => {
                // The user walked away from the checkout UI. The attempt
                // stays parked here until the view unmounts.
                info!("checkout dismissed; awaiting unmount");
                return Ok(PaymentOutcome::Abandoned);
            }
            Err(err) => {
                self.phase = PaymentPhase::Failed;
                error!(error = %err, "gateway checkout failed");
                self.events.toast_error(err.user_message()).await;
                return Ok(PaymentOutcome::GatewayFailed);
            }
        };

        self.phase = PaymentPhase::VerifyPending;
        match self.payments.verify(&proof, &self.user_id, &course_id).await {
            Ok(redirect) => {
                self.phase = PaymentPhase::Succeeded;
                self.events.send(UiEvent::Navigate(redirect.clone())).await;
                Ok(PaymentOutcome::Completed { redirect })
            }
            Err(err) => {
                self.phase = PaymentPhase::Failed;
                error!(error = %err, "payment verification failed");
                if self.config.verification_feedback() == FeedbackPolicy::Notify {
                    self.events.toast_error(err.user_message()).await;
                }
                Ok(PaymentOutcome::VerificationFailed)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_phase_for_test(&mut self, phase: PaymentPhase) {
        self.phase = phase;
    }
}

/// Timer behind the celebratory effect: visible for exactly
/// [`CELEBRATION_MILLIS`] after each successful coupon application,
/// restartable, and torn down with the view.
#[derive(Debug, Default)]
struct Celebration {
    active: Arc<AtomicBool>,
    timer: Option<JoinHandle<()>>,
}

impl Celebration {
    fn start(&mut self, events: UiEventSender) {
        self.cancel();
        self.active.store(true, Ordering::SeqCst);

        let active = Arc::clone(&self.active);
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(CELEBRATION_MILLIS)).await;
            active.store(false, Ordering::SeqCst);
            events.send(UiEvent::CelebrationEnded).await;
        }));
    }

    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for Celebration {
    fn drop(&mut self) {
        self.cancel();
    }
}
