//! Member picker example
//!
//! Serves an organization's members as a keyset-paginated list:
//! - `GET /orgs/{org}/members?q=&status=&after=&before=&start=` lists one page
//! - `POST /orgs/{org}/members/{id}/remove?after=&start=` removes a member and
//!   re-renders the same list position, recovering when the page went empty
//!
//! Try:
//! ```text
//! curl 'http://127.0.0.1:3000/orgs/acme/members'
//! curl 'http://127.0.0.1:3000/orgs/acme/members?q=ann'
//! curl 'http://127.0.0.1:3000/orgs/acme/members?q=%40example&status=active'
//! ```

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use keyset::prelude::*;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

const FULL_NAME_CI: SortField = SortField::from_static("full_name_ci");
const EMAIL: SortField = SortField::from_static("email");

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Member {
    id: Uuid,
    full_name: String,
    full_name_ci: String,
    email: String,
    org: String,
    status: String,
}

impl Member {
    fn new(org: &str, full_name: &str, status: &str) -> Self {
        let email = format!("{}@example.com", fold(full_name).replace(' ', "."));
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            full_name_ci: fold(full_name),
            email: fold_email(&email),
            org: org.to_string(),
            status: status.to_string(),
        }
    }
}

impl Record for Member {
    fn collection() -> &'static str {
        "members"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "full_name_ci" => Some(FieldValue::from(self.full_name_ci.as_str())),
            "email" => Some(FieldValue::from(self.email.as_str())),
            "org" => Some(FieldValue::from(self.org.as_str())),
            "status" => Some(FieldValue::from(self.status.as_str())),
            _ => None,
        }
    }
}

#[derive(Clone)]
struct AppState {
    store: InMemoryStore<Member>,
    paginator: Paginator<Member, InMemoryStore<Member>>,
    page_size: PageSize,
}

/// Extra filter of the member list
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatusParam {
    status: Option<String>,
}

#[derive(Serialize)]
struct RemoveResponse {
    removed: bool,
    strategy: RecoveryStrategy,
    #[serde(flatten)]
    list: ListResponse<Member>,
}

fn plan_request(
    state: &AppState,
    org: &str,
    params: &ListQuery,
    status: &StatusParam,
) -> PageRequest {
    let status = status.status.as_deref().unwrap_or_default();
    let search = params.search();
    let pivot = email_pivot_ok(search, status, true);
    let plan = SearchPlan::for_people(FULL_NAME_CI, EMAIL, search, pivot);

    let mut scope = vec![Filter::eq("org", org)];
    if !status.is_empty() {
        scope.push(Filter::eq("status", status.to_lowercase()));
    }
    scope.push(plan.filter);

    PageRequest::new(Filter::all_of(scope), plan.sort_field, state.page_size)
        .with_keyset(params.keyset())
}

async fn list_members(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Query(params): Query<ListQuery>,
    Query(status): Query<StatusParam>,
) -> Result<Json<ListResponse<Member>>, PageError> {
    let request = plan_request(&state, &org, &params, &status);
    let page = state.paginator.fetch(&request).await?;
    Ok(Json(ListResponse::from_page(page, params.start(), state.page_size)))
}

async fn remove_member(
    State(state): State<AppState>,
    Path((org, id)): Path<(String, Uuid)>,
    Query(params): Query<ListQuery>,
    Query(status): Query<StatusParam>,
) -> Result<Json<RemoveResponse>, PageError> {
    let removed = state
        .store
        .remove(&id)
        .map_err(|e| PageError::Internal(e.to_string()))?
        .is_some();
    tracing::info!(%org, %id, removed, "member removed");

    let request = plan_request(&state, &org, &params, &status);
    let outcome = state.paginator.fetch_after_mutation(&request).await?;
    // a recovered page no longer starts where the client thought it did
    let start = if outcome.recovered() { 1 } else { params.start() };

    Ok(Json(RemoveResponse {
        removed,
        strategy: outcome.strategy,
        list: ListResponse::from_page(outcome.page, start, state.page_size),
    }))
}

fn seed(store: &InMemoryStore<Member>) -> Result<()> {
    let people = [
        ("acme", "Ann Archer", "active"),
        ("acme", "Bob Bishop", "active"),
        ("acme", "Cara Çelik", "disabled"),
        ("acme", "Dev Dahl", "active"),
        ("acme", "Ève Éluard", "active"),
        ("acme", "Finn Fox", "disabled"),
        ("acme", "Gus Grant", "active"),
        ("acme", "Zoë Zhang", "active"),
        ("globex", "Hank Scorpio", "active"),
    ];
    for (org, name, status) in people {
        store.insert(Member::new(org, name, status))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,keyset=debug")),
        )
        .init();

    let config = PagingConfig::default_config();
    let store = InMemoryStore::new();
    seed(&store)?;

    let state = AppState {
        paginator: Paginator::new(Arc::new(store.clone()), &config),
        store,
        page_size: config.modal_page_size()?,
    };

    let app = Router::new()
        .route("/orgs/{org}/members", get(list_members))
        .route("/orgs/{org}/members/{id}/remove", post(remove_member))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    println!("🚀 Member picker on http://127.0.0.1:3000");
    println!("    GET  /orgs/{{org}}/members              - List members");
    println!("    POST /orgs/{{org}}/members/{{id}}/remove  - Remove a member");

    axum::serve(listener, app).await?;
    Ok(())
}
