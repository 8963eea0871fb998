use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shop_client::api;
use shop_client::conf::Settings;
use shop_client::model::{CategoryQuery, LoginForm, OrderQuery, OrderStatus, ProductListParams, RegisterForm};
use shop_client::service::{self, Route, Services};

#[derive(Parser)]
#[command(name = "shop", about = "Storefront command-line client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 商品列表（同时加载分类）
    Products {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        category: Option<u64>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// 搜索商品
    Search {
        keyword: String,
        #[arg(long)]
        page: Option<u32>,
    },
    /// 商品详情
    Product { id: u64 },
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    Logout,
    /// 当前登录用户
    Me,
    /// 本地购物车
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    Orders {
        #[arg(long)]
        status: Option<String>,
    },
    /// 打开页面路径，按登录状态守卫
    Open { path: String },
}

#[derive(Subcommand)]
enum CartAction {
    Show,
    Add {
        product_id: u64,
        #[arg(short, long, default_value_t = 1)]
        quantity: i32,
    },
    Update { product_id: u64, quantity: i32 },
    Remove { product_id: u64 },
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化配置
    let config = Settings::global();

    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 初始化服务
    let mut services = service::init_services(config)?;
    let mut notices = services.api.subscribe();
    let rejections = services.api.subscribe_rejections();
    let mut route = services.navigator.subscribe();

    let result = run(&mut services, cli.command).await;

    // 把请求管道产生的提示输出给用户
    loop {
        match notices.try_recv() {
            Ok(event) => eprintln!("! {}", event.notice()),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    // 401 后等会话观察者清掉本地会话再退出
    if rejections.has_changed().unwrap_or(false) {
        let redirected = tokio::time::timeout(
            Duration::from_secs(1),
            route.wait_for(|r| *r == Route::Login),
        )
        .await;
        if matches!(redirected, Ok(Ok(_))) {
            eprintln!("-> {}", Route::Login);
        }
    }

    result
}

async fn run(services: &mut Services, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Products {
            page,
            page_size,
            category,
            sort,
            keyword,
        } => {
            let params = ProductListParams {
                page,
                page_size,
                category_id: category,
                sort,
                keyword,
            };
            let category_query = CategoryQuery::default();
            // 商品和分类并行加载，互不依赖
            let (products, categories) = futures::join!(
                api::product::list(&services.api, &params),
                api::category::list(&services.api, &category_query)
            );
            if let Ok(categories) = categories {
                let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
                println!("categories: {}", names.join(", "));
            }
            let page = products?;
            for p in &page.list {
                println!("{}\t{}\t{}\tstock {}", p.id, p.name, p.price, p.stock);
            }
            println!("{} of {} products", page.list.len(), page.total);
        }
        Command::Search { keyword, page } => {
            let page = api::product::search(&services.api, &keyword, page, None).await?;
            for p in &page.list {
                println!("{}\t{}\t{}", p.id, p.name, p.price);
            }
            println!("{} matches", page.total);
        }
        Command::Product { id } => {
            let p = api::product::get(&services.api, id).await?;
            println!("{} [{}]\n{}\nprice {}  stock {}", p.name, p.sku, p.description, p.price, p.stock);
        }
        Command::Login { username, password } => {
            let user = services.login(&LoginForm { username, password }).await?;
            println!("logged in as {}", user.username);
        }
        Command::Register {
            username,
            email,
            phone,
            password,
            confirm,
        } => {
            let form = RegisterForm {
                username,
                email,
                phone,
                password,
                confirm,
            };
            let user = services.register(&form).await?;
            println!("registered {}", user.username);
        }
        Command::Logout => {
            services.logout()?;
            println!("logged out");
        }
        Command::Me => {
            let user = api::auth::current_user(&services.api).await?;
            println!("{} <{}> {:?}", user.username, user.email, user.role);
        }
        Command::Cart { action } => cart(services, action).await?,
        Command::Orders { status } => {
            let status = status
                .map(|s| serde_json::from_value::<OrderStatus>(serde_json::Value::String(s)))
                .transpose()?;
            let query = OrderQuery {
                status,
                ..Default::default()
            };
            let page = api::order::list(&services.api, &query).await?;
            for o in &page.list {
                println!("{}\t{}\t{}", o.order_no, o.status.as_str(), o.total_amount);
            }
        }
        Command::Open { path } => {
            let route = services.visit(Route::parse(&path));
            println!("{}", route);
        }
    }
    Ok(())
}

async fn cart(services: &mut Services, action: CartAction) -> anyhow::Result<()> {
    match action {
        CartAction::Show => {}
        CartAction::Add {
            product_id,
            quantity,
        } => {
            let product = api::product::get(&services.api, product_id).await?;
            services.cart.add_item(&product, quantity);
        }
        CartAction::Update {
            product_id,
            quantity,
        } => services.cart.update_quantity(product_id, quantity),
        CartAction::Remove { product_id } => services.cart.remove_item(product_id),
        CartAction::Clear => services.cart.clear_cart(),
    }

    for line in services.cart.items() {
        println!(
            "{}\t{}\t{} x {}\t= {}",
            line.product_id,
            line.name,
            line.price,
            line.quantity,
            line.subtotal()
        );
    }
    let total: Decimal = services.cart.total_price();
    println!("{} items, total {}", services.cart.total_items(), total.round_dp(2));
    Ok(())
}
