//! # Storefront Shell
//!
//! Line-oriented front end: one command per line, rendered as plain text.
//!
//! ## Line Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "add 1 --size M --color Black"                                         │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  tokenize (double/single quotes group words)                            │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  ShellLine::try_parse_from ──── parse error / help ──► printed as is    │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  dispatch ──► commands::* ──► Ok(rendered text) / Err(ApiError)         │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  store notices + command toasts + error toast ──► printed after output  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::{Parser, Subcommand};
use tracing::debug;

use khatti_core::{
    CatalogQuery, Money, NoticeLevel, OrderWithItems, SortBy, UserAccount, MAX_PRICE_FILTER,
};

use crate::commands::auth::{self, SignUpRequest};
use crate::commands::cart::{self, AddToCartRequest, CartItemRef, CartResponse};
use crate::commands::catalog::{
    self, BrowseResponse, HomeResponse, ProductCard, ProductDetailResponse,
};
use crate::commands::checkout::{self, CheckoutQuote, PlaceOrderResponse};
use crate::commands::orders::{self, OrderHistoryResponse};
use crate::commands::wishlist::{self, WishlistResponse};
use crate::error::ApiError;
use crate::state::{
    CatalogState, CheckoutState, ConfigState, DbState, SessionState, StoreState, Toast, ToastState,
};

// =============================================================================
// Grammar
// =============================================================================

/// One shell line.
#[derive(Debug, Parser)]
#[command(name = "khatti", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum ShellCommand {
    /// Categories, featured and trending products
    Home,
    /// List products with filters
    Browse {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        /// Minimum price in rupees
        #[arg(long, default_value_t = 0)]
        min: i64,
        /// Maximum price in rupees
        #[arg(long, default_value_t = MAX_PRICE_FILTER)]
        max: i64,
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// popularity, price-low, price-high, newest or rating
        #[arg(long, default_value = "popularity")]
        sort: SortBy,
    },
    /// Product details
    Product { id: String },
    /// Add a product to the cart
    Add {
        id: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long, short)]
        qty: Option<u32>,
    },
    /// Add a product and go to checkout
    Buy {
        id: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Set the quantity of a product in the cart
    Qty {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a product from the cart
    #[command(alias = "remove")]
    Rm {
        id: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Empty the cart
    Clear,
    /// Show the cart
    Cart,
    /// Save or unsave a product
    Heart { id: String },
    /// Move a saved product into the cart
    Move {
        id: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Show saved products
    Wishlist,
    /// Apply a coupon code
    Coupon { code: String },
    /// Order summary
    #[command(alias = "quote")]
    Checkout,
    /// Place the order
    #[command(alias = "order")]
    Place,
    /// Order history
    Orders,
    /// Create an account: signup <email> <password> <full name>
    Signup {
        email: String,
        password: String,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Sign in
    Login { email: String, password: String },
    /// Sign out
    Logout,
    /// Email a password reset link
    Reset { email: String },
    /// Set a new password from a reset token
    ResetComplete { token: String, password: String },
    /// Who is signed in
    Whoami,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Splits a line into words. Quotes group words and are dropped.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for ch in line.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// Parses a line. `Ok(None)` for a blank line; `Err` carries clap's text
/// (usage errors and help output alike).
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let words = tokenize(line);
    if words.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(|err| err.render().to_string())
}

// =============================================================================
// Shell
// =============================================================================

/// Whether the shell keeps reading after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What one line produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub flow: Flow,
    pub output: String,
}

/// All storefront state, owned for the life of the shell.
pub struct Shell {
    db: DbState,
    catalog: CatalogState,
    config: ConfigState,
    store: StoreState,
    session: SessionState,
    checkout: CheckoutState,
    toasts: ToastState,
}

impl Shell {
    pub fn new(db: DbState, catalog: CatalogState, config: ConfigState) -> Self {
        Shell {
            db,
            catalog,
            config,
            store: StoreState::new(),
            session: SessionState::new(),
            checkout: CheckoutState::new(),
            toasts: ToastState::new(),
        }
    }

    pub fn banner(&self) -> String {
        format!(
            "{} · Streetwear\nFree shipping over {} · type `help` for commands",
            self.config.store_name, self.config.free_shipping_threshold
        )
    }

    /// Runs one line and renders its result followed by any toasts.
    pub async fn handle_line(&self, line: &str) -> Outcome {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Outcome::text(String::new()),
            Err(text) => return Outcome::text(text.trim_end().to_string()),
        };
        debug!(?command, "shell command");

        if command == ShellCommand::Quit {
            return Outcome {
                flow: Flow::Quit,
                output: "Bye!".to_string(),
            };
        }

        let result = self.dispatch(command).await;

        self.toasts.extend_notices(self.store.drain_notices());
        let mut sections = Vec::new();
        match result {
            Ok(text) => sections.push(text),
            Err(err) => self.toasts.push(Toast::from(&err)),
        }
        sections.extend(self.toasts.drain().iter().map(render_toast));
        sections.retain(|s| !s.is_empty());

        Outcome::text(sections.join("\n"))
    }

    async fn dispatch(&self, command: ShellCommand) -> Result<String, ApiError> {
        let db = self.db.inner();

        match command {
            ShellCommand::Home => Ok(render_home(&catalog::home(&self.catalog))),
            ShellCommand::Browse {
                category,
                brand,
                min,
                max,
                search,
                tag,
                sort,
            } => {
                let mut query = CatalogQuery::new()
                    .price_range(Money::from_rupees(min), Money::from_rupees(max))
                    .sort(sort);
                if let Some(category) = category {
                    query = query.category(category);
                }
                if let Some(brand) = brand {
                    query = query.brand(brand);
                }
                if let Some(search) = search {
                    query = query.search(search);
                }
                if let Some(tag) = tag {
                    query = query.tag(tag);
                }
                Ok(render_browse(&catalog::browse(&self.catalog, query)?))
            }
            ShellCommand::Product { id } => {
                let detail = catalog::product_detail(&self.catalog, &self.store, &id)?;
                Ok(render_product(&detail))
            }
            ShellCommand::Add {
                id,
                size,
                color,
                qty,
            } => {
                let request = AddToCartRequest {
                    size,
                    color,
                    quantity: qty,
                    ..AddToCartRequest::new(id)
                };
                Ok(render_cart(&cart::add_to_cart(&self.catalog, &self.store, request)?))
            }
            ShellCommand::Buy { id, size, color } => {
                let request = AddToCartRequest {
                    size,
                    color,
                    ..AddToCartRequest::new(id)
                };
                cart::buy_now(&self.catalog, &self.store, request)?;
                Ok(render_quote(&self.quote()))
            }
            ShellCommand::Qty {
                id,
                quantity,
                size,
                color,
            } => {
                let item = item_ref(id, size, color);
                Ok(render_cart(&cart::update_cart_item(&self.store, item, quantity)))
            }
            ShellCommand::Rm { id, size, color } => {
                let item = item_ref(id, size, color);
                Ok(render_cart(&cart::remove_from_cart(&self.store, item)))
            }
            ShellCommand::Clear => Ok(render_cart(&cart::clear_cart(&self.store))),
            ShellCommand::Cart => Ok(render_cart(&cart::get_cart(&self.store))),
            ShellCommand::Heart { id } => {
                let toggled = wishlist::toggle_wishlist(&self.catalog, &self.store, &id)?;
                Ok(render_wishlist(&toggled.wishlist))
            }
            ShellCommand::Move { id, size, color } => {
                let moved = wishlist::move_to_cart(
                    &self.catalog,
                    &self.store,
                    &id,
                    size.as_deref(),
                    color.as_deref(),
                )?;
                Ok(format!(
                    "{}\n{}",
                    render_cart(&moved.cart),
                    render_wishlist(&moved.wishlist)
                ))
            }
            ShellCommand::Wishlist => Ok(render_wishlist(&wishlist::get_wishlist(&self.store))),
            ShellCommand::Coupon { code } => {
                let quote =
                    checkout::apply_coupon(&self.config, &self.store, &self.checkout, &code)?;
                Ok(render_quote(&quote))
            }
            ShellCommand::Checkout => Ok(render_quote(&self.quote())),
            ShellCommand::Place => {
                let placed = checkout::place_order(
                    db,
                    &self.config,
                    &self.session,
                    &self.store,
                    &self.checkout,
                    &self.toasts,
                )
                .await?;
                Ok(render_placed(&placed))
            }
            ShellCommand::Orders => {
                let history = orders::order_history(db, &self.session).await?;
                Ok(render_history(&history))
            }
            ShellCommand::Signup {
                email,
                password,
                name,
            } => {
                let request = SignUpRequest {
                    email,
                    password,
                    full_name: name.join(" "),
                };
                let account = auth::sign_up(db, &self.session, &self.toasts, request).await?;
                Ok(render_account(Some(&account)))
            }
            ShellCommand::Login { email, password } => {
                let account =
                    auth::sign_in(db, &self.session, &self.toasts, &email, &password).await?;
                Ok(render_account(Some(&account)))
            }
            ShellCommand::Logout => match auth::sign_out(&self.session) {
                Some(_) => Ok("Signed out".to_string()),
                None => Ok("Not signed in".to_string()),
            },
            ShellCommand::Reset { email } => {
                auth::reset_password(db, &self.toasts, &email).await?;
                Ok(String::new())
            }
            ShellCommand::ResetComplete { token, password } => {
                auth::complete_password_reset(db, &self.toasts, &token, &password).await?;
                Ok(String::new())
            }
            ShellCommand::Whoami => {
                Ok(render_account(auth::current_user(&self.session).as_ref()))
            }
            ShellCommand::Quit => Ok(String::new()),
        }
    }

    fn quote(&self) -> CheckoutQuote {
        checkout::checkout_quote(&self.config, &self.store, &self.checkout)
    }
}

impl Outcome {
    fn text(output: String) -> Self {
        Outcome {
            flow: Flow::Continue,
            output,
        }
    }
}

fn item_ref(id: String, size: Option<String>, color: Option<String>) -> CartItemRef {
    CartItemRef {
        product_id: id,
        size,
        color,
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn render_toast(toast: &Toast) -> String {
    let mark = match toast.level {
        NoticeLevel::Success => "✓",
        NoticeLevel::Info => "i",
        NoticeLevel::Error => "✗",
    };
    format!("[{}] {}", mark, toast.message)
}

fn render_card(card: &ProductCard) -> String {
    let mut line = format!(
        "  {:>3}  {}  ({})  {}",
        card.id, card.name, card.brand, card.discount_price
    );
    if card.discount_percent > 0 {
        line.push_str(&format!("  was {} ({}% off)", card.price, card.discount_percent));
    }
    line.push_str(&format!("  ★ {:.1} ({})", card.rating, card.review_count));
    if card.is_new {
        line.push_str("  NEW");
    }
    line
}

fn render_cards(lines: &mut Vec<String>, cards: &[ProductCard]) {
    lines.extend(cards.iter().map(render_card));
}

fn render_home(home: &HomeResponse) -> String {
    let mut lines = vec!["Shop by Category".to_string()];
    lines.extend(home.categories.iter().map(|c| format!("  {}", c.name)));
    lines.push("Featured".to_string());
    render_cards(&mut lines, &home.featured);
    lines.push("Trending Now".to_string());
    render_cards(&mut lines, &home.trending);
    lines.join("\n")
}

fn render_browse(browse: &BrowseResponse) -> String {
    let noun = if browse.count == 1 { "product" } else { "products" };
    let mut lines = vec![format!("{} · {} {}", browse.title, browse.count, noun)];
    if browse.products.is_empty() {
        lines.push("  No products found".to_string());
    }
    render_cards(&mut lines, &browse.products);
    lines.join("\n")
}

fn render_product(detail: &ProductDetailResponse) -> String {
    let product = &detail.product;
    let heart = if detail.wishlisted { "♥" } else { "♡" };

    let mut lines = vec![
        format!("{} {}", product.name, heart),
        format!("{} · {}", product.brand, product.category),
        format!("★ {:.1} ({} reviews)", product.rating, product.review_count),
        format!(
            "{}  was {}  ({}% off)",
            product.discount_price, product.price, detail.discount_percent
        ),
    ];
    if detail.savings.is_positive() {
        lines.push(format!("You save {}", detail.savings));
    }
    lines.push(detail.stock_label.clone());
    lines.push(format!("Sizes: {}", product.sizes.join(", ")));
    lines.push(format!("Colors: {}", product.colors.join(", ")));
    if !product.description.is_empty() {
        lines.push(product.description.clone());
    }
    if !detail.related.is_empty() {
        lines.push("You May Also Like".to_string());
        render_cards(&mut lines, &detail.related);
    }
    lines.join("\n")
}

fn render_cart(cart: &CartResponse) -> String {
    if cart.lines.is_empty() {
        return "Your cart is empty".to_string();
    }

    let mut lines = vec![format!("Shopping Cart ({} items)", cart.count)];
    for line in &cart.lines {
        lines.push(format!(
            "  {:>3}  {} ({} / {}) × {}  {}",
            line.product_id, line.name, line.size, line.color, line.quantity, line.line_total
        ));
    }
    lines.push(format!("Subtotal: {}", cart.subtotal));
    lines.join("\n")
}

fn render_wishlist(wishlist: &WishlistResponse) -> String {
    if wishlist.items.is_empty() {
        return "Your wishlist is empty".to_string();
    }

    let mut lines = vec![format!("My Wishlist ({} items)", wishlist.count)];
    render_cards(&mut lines, &wishlist.items);
    lines.join("\n")
}

fn render_quote(quote: &CheckoutQuote) -> String {
    let summary = &quote.summary;
    let shipping = if summary.is_free_shipping() {
        "FREE".to_string()
    } else {
        summary.shipping.to_string()
    };

    let mut lines = vec![render_cart(&quote.cart), "Order Summary".to_string()];
    lines.push(format!("  Subtotal          {}", summary.subtotal));
    lines.push(format!("  Shipping          {}", shipping));
    lines.push(format!("  GST ({}%)         {}", quote.tax_percent, summary.tax));
    if let Some(code) = &summary.coupon_code {
        lines.push(format!("  Discount ({})  -{}", code, summary.discount));
    }
    lines.push(format!("  Total             {}", summary.total));
    lines.join("\n")
}

fn render_placed(placed: &PlaceOrderResponse) -> String {
    format!(
        "Order {} placed · {} item(s) · {}",
        placed.reference,
        placed.order.items.len(),
        placed.order.order.total_amount
    )
}

fn render_order(entry: &OrderWithItems) -> Vec<String> {
    let order = &entry.order;
    let mut lines = vec![format!(
        "{}  {}  {}  {}",
        order.short_ref(),
        order.created_at.format("%d %b %Y"),
        order.order_status.label(),
        order.total_amount
    )];
    for item in &entry.items {
        let variant = match (&item.size, &item.color) {
            (Some(size), Some(color)) => format!(" ({} / {})", size, color),
            (Some(v), None) | (None, Some(v)) => format!(" ({})", v),
            (None, None) => String::new(),
        };
        lines.push(format!(
            "    {}{} × {}  {}",
            item.product_name, variant, item.quantity, item.price
        ));
    }
    lines
}

fn render_history(history: &OrderHistoryResponse) -> String {
    if history.orders.is_empty() {
        return "No orders yet".to_string();
    }

    let mut lines = vec!["My Orders".to_string()];
    for entry in &history.orders {
        lines.extend(render_order(entry));
    }
    lines.join("\n")
}

fn render_account(account: Option<&UserAccount>) -> String {
    match account {
        Some(account) => format!("Signed in as {} <{}>", account.full_name, account.email),
        None => "Not signed in".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khatti_core::Catalog;
    use khatti_db::{Database, DbConfig};

    async fn shell() -> Shell {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Shell::new(
            DbState::new(db),
            CatalogState::new(Catalog::builtin().unwrap()),
            ConfigState::default(),
        )
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"signup a@b.com pw "Asha  Rao" 'x y'"#),
            vec!["signup", "a@b.com", "pw", "Asha  Rao", "x y"]
        );
        assert_eq!(tokenize("  cart  "), vec!["cart"]);
        assert_eq!(tokenize(r#"coupon """#), vec!["coupon", ""]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_parse_browse_flags() {
        let command = parse_line("browse --category T-Shirts --sort price-low --max 1500")
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            ShellCommand::Browse {
                category: Some("T-Shirts".to_string()),
                brand: None,
                min: 0,
                max: 1500,
                search: None,
                tag: None,
                sort: SortBy::PriceLow,
            }
        );
    }

    #[test]
    fn test_parse_aliases_and_errors() {
        assert_eq!(parse_line("quote").unwrap(), Some(ShellCommand::Checkout));
        assert_eq!(parse_line("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(
            parse_line("qty 3 -1").unwrap(),
            Some(ShellCommand::Qty {
                id: "3".to_string(),
                quantity: -1,
                size: None,
                color: None,
            })
        );
        assert_eq!(parse_line("").unwrap(), None);
        assert!(parse_line("browse --sort cheapest").is_err());
        assert!(parse_line("teleport").is_err());
    }

    #[test]
    fn test_parse_signup_joins_name() {
        match parse_line("signup zoya@example.com secret123 Zoya Khan").unwrap() {
            Some(ShellCommand::Signup { name, .. }) => assert_eq!(name.join(" "), "Zoya Khan"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_shows_cart_and_toast() {
        let shell = shell().await;
        let outcome = shell.handle_line("add 1 --size M --color Black").await;
        assert_eq!(outcome.flow, Flow::Continue);
        assert!(outcome.output.contains("Shopping Cart (1 items)"));
        assert!(outcome.output.ends_with("[✓] Added to cart"));
    }

    #[tokio::test]
    async fn test_oversized_quantity_leaves_cart_unchanged() {
        let shell = shell().await;
        shell.handle_line("add 1").await;

        let outcome = shell.handle_line("qty 1 99999999999").await;
        assert!(outcome.output.starts_with("Shopping Cart (1 items)"));

        let outcome = shell.handle_line("qty 1 99").await;
        assert!(outcome.output.starts_with("Shopping Cart (99 items)"));
    }

    #[tokio::test]
    async fn test_errors_become_toasts() {
        let shell = shell().await;
        let outcome = shell.handle_line("product 999").await;
        assert_eq!(outcome.output, "[✗] Product Not Found");

        let outcome = shell.handle_line("place").await;
        assert_eq!(outcome.output, "[i] Please sign in to place an order");
    }

    #[tokio::test]
    async fn test_full_purchase() {
        let shell = shell().await;
        shell.handle_line("signup asha@example.com khatti123 Asha Rao").await;
        shell.handle_line("add 11").await;
        shell.handle_line("add 11").await;

        let outcome = shell.handle_line("checkout").await;
        assert!(outcome.output.contains("FREE"));

        let outcome = shell.handle_line("place").await;
        assert!(outcome.output.contains("Order #"));
        assert!(outcome.output.contains("[✓] Order placed successfully!"));

        assert_eq!(shell.handle_line("cart").await.output, "Your cart is empty");
        assert!(shell.handle_line("orders").await.output.starts_with("My Orders"));
    }

    #[tokio::test]
    async fn test_quit() {
        let shell = shell().await;
        assert_eq!(shell.handle_line("quit").await.flow, Flow::Quit);
    }
}
