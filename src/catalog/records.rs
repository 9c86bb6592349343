//! Record types edited through the dashboard forms, with their seed data.
//!
//! Field names go over the wire in camelCase (`conversionRate`,
//! `createdAt`) and kinds as `type`, matching what the dashboard page sends.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::store::next_numeric_id;

// ---------------------------------------------------------------------------
// Statuses and kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffiliateStatus {
    #[default]
    Active,
    Inactive,
}

impl AffiliateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Draft,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Draft => "draft",
        }
    }
}

/// Status shared by funnels and conversation flows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    #[default]
    Draft,
}

impl CampaignStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Draft => "draft",
        }
    }

    /// `active` pauses; anything else activates.
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Paused,
            Self::Paused | Self::Draft => Self::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    #[default]
    Curso,
    Ebook,
    Mentoria,
    Software,
    Consultoria,
    Outro,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelKind {
    #[default]
    Sales,
    Lead,
    Webinar,
    Product,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    #[default]
    Landing,
    Checkout,
    Upsell,
    Downsell,
    Thankyou,
    Email,
    Sms,
    Wait,
}

impl StepKind {
    /// Name given to a freshly added step.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Landing => "Landing Page",
            Self::Checkout => "Checkout",
            Self::Upsell => "Upsell",
            Self::Downsell => "Downsell",
            Self::Thankyou => "Obrigado",
            Self::Email => "Email",
            Self::Wait => "Aguardar",
            Self::Sms => "Nova Etapa",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Whatsapp,
    Telegram,
    Messenger,
    Email,
    Sms,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Affiliate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub sales: u64,
    /// Commission earned, BRL.
    pub commission: f64,
    pub conversion_rate: f64,
    pub status: AffiliateStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    /// Affiliate commission, percent of price.
    pub commission: f64,
    pub status: ProductStatus,
    pub image: String,
    pub sales: u64,
    pub created_at: DateTime<Utc>,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            price: 0.0,
            category: ProductCategory::default(),
            commission: 30.0,
            status: ProductStatus::default(),
            image: String::new(),
            sales: 0,
            created_at: DateTime::<Utc>::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FunnelStep {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub visitors: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Funnel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: CampaignStatus,
    #[serde(rename = "type")]
    pub kind: FunnelKind,
    pub visitors: u64,
    pub conversions: u64,
    pub revenue: f64,
    pub conversion_rate: f64,
    pub created_at: DateTime<Utc>,
    pub steps: Vec<FunnelStep>,
}

impl Funnel {
    /// Append a zeroed step of `kind` and return its id.
    pub fn add_step(&mut self, kind: StepKind) -> String {
        let id = next_numeric_id(self.steps.iter().map(|s| s.id.as_str()));
        self.steps.push(FunnelStep {
            id: id.clone(),
            name: kind.default_name().to_string(),
            kind,
            ..FunnelStep::default()
        });
        id
    }

    /// Remove a step by id. Returns false when no step has that id.
    pub fn remove_step(&mut self, step_id: &str) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| s.id != step_id);
        self.steps.len() != before
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversationFlow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub platform: Platform,
    pub status: CampaignStatus,
    pub triggers: Vec<String>,
    pub messages: u64,
    pub conversions: u64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub fn seed_affiliates() -> Vec<Affiliate> {
    vec![
        Affiliate {
            id: "1".to_string(),
            name: "Carlos Afiliado".to_string(),
            email: "carlos@email.com".to_string(),
            sales: 45,
            commission: 2850.0,
            conversion_rate: 8.5,
            status: AffiliateStatus::Active,
        },
        Affiliate {
            id: "2".to_string(),
            name: "Ana Afiliada".to_string(),
            email: "ana@email.com".to_string(),
            sales: 32,
            commission: 1920.0,
            conversion_rate: 6.2,
            status: AffiliateStatus::Active,
        },
        Affiliate {
            id: "3".to_string(),
            name: "Roberto Silva".to_string(),
            email: "roberto@email.com".to_string(),
            sales: 28,
            commission: 1680.0,
            conversion_rate: 5.8,
            status: AffiliateStatus::Inactive,
        },
    ]
}

pub fn seed_products(now: DateTime<Utc>) -> Vec<Product> {
    let product = |id: &str, name: &str, category, price, sales, days| Product {
        id: id.to_string(),
        name: name.to_string(),
        category,
        price,
        sales,
        created_at: now - Duration::days(days),
        ..Product::default()
    };
    vec![
        product("1", "Curso Marketing Digital", ProductCategory::Curso, 497.0, 45, 60),
        product("2", "E-book Vendas", ProductCategory::Ebook, 97.0, 32, 45),
        product("3", "Mentoria Premium", ProductCategory::Mentoria, 1997.0, 28, 30),
    ]
}

fn step(id: &str, name: &str, kind: StepKind, visitors: u64, conversions: u64, rate: f64) -> FunnelStep {
    FunnelStep {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        visitors,
        conversions,
        conversion_rate: rate,
    }
}

pub fn seed_funnels(now: DateTime<Utc>) -> Vec<Funnel> {
    vec![
        Funnel {
            id: "1".to_string(),
            name: "Funil Curso Marketing Digital".to_string(),
            description: "Funil completo para venda do curso de marketing digital".to_string(),
            status: CampaignStatus::Active,
            kind: FunnelKind::Sales,
            visitors: 2847,
            conversions: 156,
            revenue: 77532.0,
            conversion_rate: 5.48,
            created_at: now - Duration::days(15),
            steps: vec![
                step("1", "Landing Page", StepKind::Landing, 2847, 1423, 50.0),
                step("2", "Checkout", StepKind::Checkout, 1423, 156, 11.0),
                step("3", "Upsell Premium", StepKind::Upsell, 156, 47, 30.1),
                step("4", "Página de Obrigado", StepKind::Thankyou, 156, 156, 100.0),
            ],
        },
        Funnel {
            id: "2".to_string(),
            name: "Captura de Leads E-book".to_string(),
            description: "Funil de captura para e-book gratuito".to_string(),
            status: CampaignStatus::Active,
            kind: FunnelKind::Lead,
            visitors: 5234,
            conversions: 892,
            revenue: 0.0,
            conversion_rate: 17.05,
            created_at: now - Duration::days(8),
            steps: vec![
                step("1", "Landing Page", StepKind::Landing, 5234, 892, 17.05),
                step("2", "Página de Obrigado", StepKind::Thankyou, 892, 892, 100.0),
            ],
        },
        Funnel {
            id: "3".to_string(),
            name: "Webinar Vendas Avançadas".to_string(),
            description: "Funil para webinar de vendas com oferta especial".to_string(),
            status: CampaignStatus::Paused,
            kind: FunnelKind::Webinar,
            visitors: 1456,
            conversions: 89,
            revenue: 178300.0,
            conversion_rate: 6.11,
            created_at: now - Duration::days(30),
            steps: vec![
                step("1", "Inscrição Webinar", StepKind::Landing, 1456, 456, 31.3),
                step("2", "Página do Webinar", StepKind::Landing, 456, 234, 51.3),
                step("3", "Oferta Especial", StepKind::Checkout, 234, 89, 38.0),
            ],
        },
    ]
}

fn triggers(items: &[&str]) -> Vec<String> {
    items.iter().map(|t| t.to_string()).collect()
}

pub fn seed_flows(now: DateTime<Utc>) -> Vec<ConversationFlow> {
    vec![
        ConversationFlow {
            id: "1".to_string(),
            name: "Boas-vindas WhatsApp".to_string(),
            description: "Fluxo de boas-vindas para novos leads no WhatsApp".to_string(),
            platform: Platform::Whatsapp,
            status: CampaignStatus::Active,
            triggers: triggers(&["palavra-chave: oi", "palavra-chave: olá", "primeiro contato"]),
            messages: 1247,
            conversions: 89,
            created_at: now - Duration::days(10),
        },
        ConversationFlow {
            id: "2".to_string(),
            name: "Sequência Email Marketing".to_string(),
            description: "Sequência de 7 emails para nutrição de leads".to_string(),
            platform: Platform::Email,
            status: CampaignStatus::Active,
            triggers: triggers(&["download e-book", "inscrição newsletter"]),
            messages: 3456,
            conversions: 234,
            created_at: now - Duration::days(20),
        },
        ConversationFlow {
            id: "3".to_string(),
            name: "Recuperação Carrinho".to_string(),
            description: "Fluxo para recuperar carrinhos abandonados".to_string(),
            platform: Platform::Email,
            status: CampaignStatus::Active,
            triggers: triggers(&["carrinho abandonado"]),
            messages: 567,
            conversions: 123,
            created_at: now - Duration::days(5),
        },
    ]
}
