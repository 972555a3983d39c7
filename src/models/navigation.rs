// src/models/navigation.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::auth::Role;

// (title, url, icon)
type Link = (&'static str, &'static str, &'static str);

struct RoleMenu {
    main: &'static [Link],
    documents: &'static [Link],
}

const ADMIN_MENU: RoleMenu = RoleMenu {
    main: &[
        ("Dashboard", "/dashboard/admin", "layout-dashboard"),
        ("Vendors", "/dashboard/vendors", "users"),
        ("Products", "/dashboard/products", "box"),
        ("Orders", "/dashboard/orders", "shopping-cart"),
        ("Invoices", "/dashboard/invoices", "file-output"),
        ("Reservations", "/dashboard/reservations", "clipboard-list"),
        ("Analytical Accounts", "/dashboard/analytical-accounts", "bar-chart-2"),
        ("Auto-Analytical Models", "/dashboard/auto-analytical-models", "bar-chart-2"),
        ("Budgets", "/dashboard/budgets", "bar-chart-2"),
    ],
    documents: &[
        ("Orders Report", "/dashboard/reports/orders", "bar-chart-2"),
        ("Revenue Report", "/dashboard/reports/revenue", "bar-chart-2"),
    ],
};

const VENDOR_MENU: RoleMenu = RoleMenu {
    main: &[
        ("Dashboard", "/dashboard/vendor", "layout-dashboard"),
        ("My Products", "/dashboard/products", "box"),
        ("Orders", "/dashboard/orders", "shopping-cart"),
        ("Invoices", "/dashboard/invoices", "file-output"),
        ("Reservations", "/dashboard/reservations", "clipboard-list"),
    ],
    documents: &[
        ("My Orders Report", "/dashboard/reports/orders", "bar-chart-2"),
        ("Earnings Report", "/dashboard/reports/revenue", "bar-chart-2"),
    ],
};

const CUSTOMER_MENU: RoleMenu = RoleMenu {
    main: &[
        ("Dashboard", "/dashboard", "layout-dashboard"),
        ("Browse Products", "/dashboard/products", "box"),
        ("My Orders", "/dashboard/orders", "shopping-cart"),
        ("My Invoices", "/dashboard/invoices", "file-output"),
        ("My Reservations", "/dashboard/reservations", "clipboard-list"),
    ],
    documents: &[("My Rentals Report", "/dashboard/reports/rentals", "bar-chart-2")],
};

// Shared by every role
const SECONDARY: &[Link] = &[
    ("Settings", "/dashboard/settings", "settings"),
    ("Help", "/dashboard/help", "help-circle"),
    ("Search", "/dashboard/search", "search"),
];

impl Role {
    fn menu(self) -> &'static RoleMenu {
        match self {
            Role::Admin => &ADMIN_MENU,
            Role::Vendor => &VENDOR_MENU,
            Role::Customer => &CUSTOMER_MENU,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub title: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub role: Role,
    pub nav_main: Vec<NavItem>,
    pub nav_secondary: Vec<NavItem>,
    pub documents: Vec<NavItem>,
}

fn to_items(links: &[Link]) -> Vec<NavItem> {
    links
        .iter()
        .map(|(title, url, icon)| NavItem {
            title: title.to_string(),
            url: url.to_string(),
            icon: icon.to_string(),
        })
        .collect()
}

impl Navigation {
    pub fn for_role(role: Role) -> Self {
        let menu = role.menu();
        Self {
            role,
            nav_main: to_items(menu.main),
            nav_secondary: to_items(SECONDARY),
            documents: to_items(menu.documents),
        }
    }
}
