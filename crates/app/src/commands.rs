//! Command handlers.
//!
//! Each handler drives one view controller the way a screen would, then
//! prints what the screen would show. Pending notices are flushed to stderr
//! after every command.

use std::error::Error;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use marquee_application::views::{
    CheckoutView, HomeView, LoginView, MovieCard, MovieView, NavBar, OrderHistoryView,
    PricingView, ProfileView, ResetPasswordView, ResetStep, SearchView, SignUpView,
};
use marquee_application::{
    BusySignal, Notifier, SessionManager, StorefrontApi, TokenStore, ViewContext,
};
use marquee_domain::{
    CoinPlan, MovieId, MovieSummary, NoticeLevel, PaymentMethod, Route, resolve_media_url,
};
use marquee_infrastructure::{
    ClientConfig, FileTokenPersistence, ReqwestStorefrontApi, load_screenshot,
};

use crate::cli::Commands;

type CommandResult = Result<Option<Route>, Box<dyn Error>>;

/// Wired-up client: one session shared by every view.
pub struct App {
    ctx: ViewContext,
    config: ClientConfig,
}

impl App {
    /// Builds the adapters and restores any stored session.
    pub async fn connect(config: ClientConfig) -> Result<Self, Box<dyn Error>> {
        let api: Arc<dyn StorefrontApi> = Arc::new(ReqwestStorefrontApi::from_config(&config)?);
        let persistence = FileTokenPersistence::new(config.resolved_token_path()?);
        debug!(path = %persistence.path().display(), "using credential file");

        let tokens = TokenStore::open(Arc::new(persistence));
        let session = Arc::new(SessionManager::new(tokens, Arc::clone(&api)));
        let restored = session.restore().await;
        debug!(?restored, "session restored");

        let ctx = ViewContext::new(api, session, BusySignal::new(), Notifier::without_expiry());
        Ok(Self { ctx, config })
    }

    /// Runs one command and prints its outcome.
    pub async fn run(&self, command: Commands) -> Result<(), Box<dyn Error>> {
        let result = self.dispatch(command).await;
        self.flush_notices();

        if let Some(route) = result? {
            print_route_hint(&route);
        }
        Ok(())
    }

    async fn dispatch(&self, command: Commands) -> CommandResult {
        match command {
            Commands::Home => self.home().await,
            Commands::Search { key, page } => self.search(&key, page).await,
            Commands::Movie {
                id,
                toggle_watchlist,
            } => self.movie(id, toggle_watchlist).await,
            Commands::Play { id, search, yes } => self.play(id, search.as_deref(), yes).await,
            Commands::Login { email, password } => self.login(&email, &password).await,
            Commands::Register {
                email,
                username,
                password,
            } => self.register(&email, &username, &password).await,
            Commands::Logout => Ok(self.logout()),
            Commands::Whoami => self.whoami().await,
            Commands::Rename { username } => self.rename(&username).await,
            Commands::Plans => Ok(Self::plans()),
            Commands::Buy {
                plan,
                method,
                screenshot,
            } => self.buy(&plan, method, &screenshot).await,
            Commands::Orders => self.orders().await,
            Commands::ResetPassword { email } => self.reset_password(&email).await,
            Commands::Open { path } => self.open(&path).await,
        }
    }

    async fn open(&self, path: &str) -> CommandResult {
        match path.parse::<Route>()? {
            Route::Home => self.home().await,
            Route::Search { key } => self.search(&key, 1).await,
            Route::Movie { id } => self.movie(id, false).await,
            Route::Profile => self.whoami().await,
            Route::Pricing => Ok(Self::plans()),
            Route::OrderHistory => self.orders().await,
            route => Ok(Some(route)),
        }
    }

    async fn home(&self) -> CommandResult {
        let mut view = HomeView::new(self.ctx.clone());
        let route = interruptible(view.cancel_handle(), view.load()).await;

        self.print_account_badge();
        for (category, movies) in view.catalog().rows() {
            println!("\n{category}");
            for movie in movies {
                println!("  {}", describe(movie));
            }
        }
        Ok(route)
    }

    async fn search(&self, input: &str, page: u32) -> CommandResult {
        let Some(Route::Search { key }) = NavBar::new(self.ctx.clone()).search(input) else {
            println!("Type something to search for.");
            return Ok(None);
        };

        let mut view = SearchView::with_page(self.ctx.clone(), key, page);
        interruptible(view.cancel_handle(), view.load()).await;

        println!(
            "Results for '{}' (page {} of {})",
            view.key(),
            view.page(),
            view.total_pages()
        );
        if view.results().is_empty() {
            println!("  No movies found.");
        }
        for movie in view.results() {
            println!("  {}", describe(movie));
        }
        Ok(None)
    }

    async fn movie(&self, id: MovieId, toggle: bool) -> CommandResult {
        let mut view = MovieView::new(self.ctx.clone(), id);
        if let Some(route) = interruptible(view.cancel_handle(), view.load()).await {
            return Ok(Some(route));
        }

        if toggle {
            let cancel = view.cancel_handle();
            if let Some(route) = interruptible(cancel, view.toggle_watchlist()).await {
                return Ok(Some(route));
            }
        }

        let Some(detail) = view.detail() else {
            return Ok(None);
        };
        let movie = &detail.summary;
        println!("{} ({})", movie.title, movie.caption());
        println!("Director: {}", detail.director_or_unknown());
        if let Some(description) = &detail.description {
            println!("\n{description}\n");
        }
        println!(
            "Poster: {}",
            resolve_media_url(&movie.thumbnail, &self.config.api_url)
        );
        println!("Price: {}", price(movie));
        println!(
            "Watchlist: {}",
            if view.is_watchlisted() { "yes" } else { "no" }
        );

        if !view.recommended().is_empty() {
            println!("\nYou might also like");
            for movie in view.recommended() {
                println!("  {}", describe(movie));
            }
        }
        Ok(None)
    }

    async fn play(&self, id: MovieId, search: Option<&str>, yes: bool) -> CommandResult {
        let listed = match search {
            Some(key) => {
                let mut view = SearchView::new(self.ctx.clone(), key.trim());
                interruptible(view.cancel_handle(), view.load()).await;
                view.results().iter().find(|movie| movie.id == id).cloned()
            }
            None => {
                let mut view = HomeView::new(self.ctx.clone());
                if let Some(route) = interruptible(view.cancel_handle(), view.load()).await {
                    return Ok(Some(route));
                }
                view.catalog()
                    .rows()
                    .flat_map(|(_, movies)| movies)
                    .find(|movie| movie.id == id)
                    .cloned()
            }
        };
        let Some(movie) = listed else {
            match search {
                Some(key) => println!("Movie {id} is not in the results for '{key}'."),
                None => println!(
                    "Movie {id} is not on the home page; pass --search with a term that finds it."
                ),
            }
            return Ok(None);
        };

        // Loading the movie page spends coins; gate on the card first.
        let card = MovieCard::new(self.ctx.clone(), movie);
        if card.play(|prompt| yes || confirm(prompt)).is_none() {
            return Ok(None);
        }

        let mut view = MovieView::new(self.ctx.clone(), id);
        if let Some(route) = interruptible(view.cancel_handle(), view.load()).await {
            return Ok(Some(route));
        }
        if let Some(detail) = view.detail() {
            match &detail.embedded {
                Some(embed) => println!("{embed}"),
                None => println!("No player is available for {}.", detail.summary.title),
            }
        }
        Ok(None)
    }

    async fn login(&self, email: &str, password: &str) -> CommandResult {
        let mut view = LoginView::new(self.ctx.clone());
        let route = interruptible(view.cancel_handle(), view.submit(email, password)).await;
        if let Some(error) = view.error() {
            eprintln!("{error}");
        }
        self.print_account_badge();
        Ok(route.filter(|r| *r != Route::Home))
    }

    async fn register(&self, email: &str, username: &str, password: &str) -> CommandResult {
        let mut view = SignUpView::new(self.ctx.clone());
        let route =
            interruptible(view.cancel_handle(), view.submit(email, username, password)).await;
        if let Some(error) = view.error() {
            eprintln!("{error}");
        }
        self.print_account_badge();
        Ok(route.filter(|r| *r != Route::Home))
    }

    fn logout(&self) -> Option<Route> {
        ProfileView::new(self.ctx.clone()).logout();
        println!("Signed out.");
        None
    }

    async fn whoami(&self) -> CommandResult {
        let mut view = ProfileView::new(self.ctx.clone());
        if let Some(route) = interruptible(view.cancel_handle(), view.load()).await {
            return Ok(Some(route));
        }

        if let Some(profile) = view.profile() {
            println!("{} <{}>", view.username(), profile.email);
            println!("Coins: {}", profile.coins);
        }
        println!("\nWatchlist");
        if view.watchlist().is_empty() {
            println!("  (empty)");
        }
        for entry in view.watchlist() {
            println!("  {}", describe(&entry.movie));
        }
        Ok(None)
    }

    async fn rename(&self, username: &str) -> CommandResult {
        let mut view = ProfileView::new(self.ctx.clone());
        if let Some(route) = interruptible(view.cancel_handle(), view.load()).await {
            return Ok(Some(route));
        }
        let route = interruptible(view.cancel_handle(), view.save_username(username)).await;
        println!("Display name: {}", view.username());
        Ok(route)
    }

    fn plans() -> Option<Route> {
        for plan in PricingView::new().plans() {
            println!("{} for {}", plan.name, plan.fee);
            for feature in plan.features() {
                println!("  - {feature}");
            }
        }
        println!("\nPay with:");
        for method in PaymentMethod::ALL {
            println!("  {} ({})", method.name(), method.id());
        }
        None
    }

    async fn buy(&self, plan: &str, method: PaymentMethod, screenshot: &Path) -> CommandResult {
        let Some(plan) = CoinPlan::by_name(plan) else {
            let names: Vec<&str> = CoinPlan::ALL.iter().map(|p| p.name).collect();
            let message = format!("unknown plan '{plan}' (expected one of: {})", names.join(", "));
            return Err(message.into());
        };

        let route = PricingView::new().choose(&plan);
        let mut view = CheckoutView::open(self.ctx.clone(), &route);
        if let Some(route) = view.mount() {
            return Ok(Some(route));
        }

        view.select_method(method);
        view.attach_screenshot(load_screenshot(screenshot).await?);
        println!(
            "Paying {} via {} to:\n{}",
            view.draft().fee,
            method.name(),
            method.account()
        );

        Ok(interruptible(view.cancel_handle(), view.submit()).await)
    }

    async fn orders(&self) -> CommandResult {
        let mut view = OrderHistoryView::new(self.ctx.clone());
        if let Some(route) = interruptible(view.cancel_handle(), view.load()).await {
            return Ok(Some(route));
        }

        if let Some(error) = view.error() {
            eprintln!("{error}");
            return Ok(None);
        }
        if view.orders().is_empty() {
            println!("No orders yet.");
        }
        for order in view.orders() {
            println!(
                "#{:<5} {:>4} coins  {:<9} {}",
                order.id,
                order.plan,
                order.status.label(),
                order.created_at.format("%Y-%m-%d %H:%M")
            );
        }
        Ok(None)
    }

    async fn reset_password(&self, email: &str) -> CommandResult {
        let mut view = ResetPasswordView::new(self.ctx.clone());
        interruptible(view.cancel_handle(), view.send_otp(email)).await;
        self.flush_notices();

        while view.step() == ResetStep::ConfirmReset {
            if let Some(error) = view.error() {
                eprintln!("{error}");
            }
            let Some(otp) = prompt_line("OTP code: ")? else {
                return Ok(None);
            };
            let Some(password) = prompt_line("New password: ")? else {
                return Ok(None);
            };
            interruptible(view.cancel_handle(), view.reset(&otp, &password)).await;
        }

        if let Some(error) = view.error() {
            eprintln!("{error}");
        }
        if let Some(success) = view.success() {
            println!("{success}");
            return Ok(Some(Route::Login));
        }
        Ok(None)
    }

    fn print_account_badge(&self) {
        let nav = NavBar::new(self.ctx.clone());
        match (self.ctx.session().user(), nav.coin_badge()) {
            (Some(user), Some(coins)) => println!("Signed in as {} ({coins} coins)", user.username),
            _ if self.ctx.session().is_logged_in() => println!("Signed in"),
            _ => {}
        }
    }

    fn flush_notices(&self) {
        let notifier = self.ctx.notifier();
        for notice in notifier.active() {
            match notice.level {
                NoticeLevel::Error => eprintln!("error: {}", notice.message),
                NoticeLevel::Success | NoticeLevel::Info => eprintln!("{}", notice.message),
            }
        }
        notifier.clear();
    }
}

/// One-line card: id, title, caption, price, and a star when watchlisted.
fn describe(movie: &MovieSummary) -> String {
    let watch = if movie.is_watchlisted { " *" } else { "" };
    format!(
        "[{}] {} ({}) {}{watch}",
        movie.id,
        movie.title,
        movie.caption(),
        price(movie)
    )
}

fn price(movie: &MovieSummary) -> String {
    if movie.is_premium() {
        format!("{} coins", movie.coins)
    } else {
        "free".to_string()
    }
}

fn print_route_hint(route: &Route) {
    match route {
        Route::Login => eprintln!("Sign in first: marquee login --email <EMAIL>"),
        Route::SignUp => eprintln!("Create an account: marquee register"),
        Route::ResetPassword => eprintln!("Reset your password: marquee reset-password"),
        Route::OrderHistory => println!("Track your order with: marquee orders"),
        Route::Checkout { plan, .. } => println!("Buy it with: marquee buy --plan \"{plan}\""),
        Route::Home => println!("Back to: marquee home"),
        other => println!("Next: marquee open {other}"),
    }
}

/// Awaits `work`; on Ctrl-C tears the view down and lets `work` finish with
/// its result discarded.
async fn interruptible<F: Future>(cancel: CancellationToken, work: F) -> F::Output {
    tokio::pin!(work);
    tokio::select! {
        biased;
        output = &mut work => output,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("interrupted; discarding the outstanding request");
            cancel.cancel();
            work.await
        }
    }
}

fn confirm(prompt: &str) -> bool {
    matches!(
        prompt_line(&format!("{prompt} [y/N] ")),
        Ok(Some(answer)) if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
    )
}

/// Reads one trimmed line from stdin. `None` at end of input.
fn prompt_line(prompt: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn connect(server: &MockServer, dir: &TempDir, coins: u64) -> App {
        let token_path = dir.path().join("token");
        std::fs::write(&token_path, "abc123").unwrap();
        Mock::given(method("GET"))
            .and(path("/api/auth/token/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7, "username": "thura", "email": "thura@example.com", "coins": coins
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/movies/home/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Hot Movies": [{"id": 5, "title": "Dune", "coins": 40}]
            })))
            .mount(server)
            .await;

        let config = ClientConfig::default()
            .with_api_url(&server.uri())
            .unwrap()
            .with_token_path(token_path);
        App::connect(config).await.unwrap()
    }

    async fn detail_requests(server: &MockServer) -> usize {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|request| request.url.path() == "/api/movies/5/")
            .count()
    }

    #[tokio::test]
    async fn test_play_refused_before_movie_page_is_fetched() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/api/movies/5/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 5, "title": "Dune", "coins": 40})),
            )
            .expect(0)
            .mount(&server)
            .await;
        let app = connect(&server, &dir, 0).await;

        let route = app.play(5, None, false).await.unwrap();

        assert_eq!(route, None);
        assert_eq!(detail_requests(&server).await, 0);
        assert_eq!(
            app.ctx.notifier().messages(),
            vec!["Insufficient coins to play this movie."]
        );
    }

    #[tokio::test]
    async fn test_confirmed_play_opens_movie_page() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/api/movies/5/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5, "title": "Dune", "coins": 40, "embedded": "<iframe></iframe>"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/movies/watchlist/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        let app = connect(&server, &dir, 100).await;

        let route = app.play(5, None, true).await.unwrap();

        assert_eq!(route, None);
        assert_eq!(detail_requests(&server).await, 1);
        assert!(app.ctx.notifier().active().is_empty());
    }

    #[tokio::test]
    async fn test_play_of_unlisted_movie_makes_no_detail_call() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let app = connect(&server, &dir, 100).await;

        let route = app.play(9, None, true).await.unwrap();

        assert_eq!(route, None);
        assert_eq!(detail_requests(&server).await, 0);
    }
}
