//! End-to-end flows against a real Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use navigo::{build_app, images::seed, AppState};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

struct Client {
    app: Router,
    token: Option<String>,
}

impl Client {
    async fn new(db: PgPool) -> Self {
        let state = AppState::with_db(db);
        seed::seed_destinations(&state.db, state.images.as_ref())
            .await
            .unwrap();
        Self {
            app: build_app(state),
            token: None,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = &self.token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let res = self.app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn signup_and_login(&mut self, username: &str, email: &str, password: &str) {
        let (status, _) = self
            .send(
                Method::POST,
                "/signup",
                Some(json!({"username": username, "email": email, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        self.login(email, password).await;
    }

    async fn login(&mut self, email: &str, password: &str) {
        let (status, body) = self
            .send(
                Method::POST,
                "/login",
                Some(json!({"email": email, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        self.token = body["token"].as_str().map(str::to_string);
        assert!(self.token.is_some());
    }

    async fn destination_id(&self, name: &str) -> i64 {
        let (_, list) = self.send(Method::GET, "/api/destinations?sort=name", None).await;
        list.as_array()
            .unwrap()
            .iter()
            .find(|d| d["name"] == name)
            .and_then(|d| d["id"].as_i64())
            .unwrap()
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn booking_flow_computes_gst_and_lists_my_bookings(db: PgPool) {
    let mut client = Client::new(db).await;
    client.signup_and_login("alice", "a@x.com", "secret1").await;

    let (status, body) = client
        .send(
            Method::POST,
            "/api/bookings",
            Some(json!({
                "services": ["hotel"],
                "options": {"hotel": {"name": "Lake View", "price": 100}},
                "travelers": 2,
                "startDate": "2025-01-10",
                "endDate": "2025-01-12",
                "traveler": {"name": "Alice", "email": "a@x.com", "phone": "99999"}
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["booking"]["total_amount"], 236.0);
    assert_eq!(body["booking"]["status"], "confirmed");
    let booking_id = body["booking_id"].as_i64().unwrap();

    let (status, mine) = client.send(Method::GET, "/api/bookings/my", None).await;
    assert_eq!(status, StatusCode::OK);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["id"], booking_id);
    assert_eq!(mine[0]["amount"], 200.0);
    assert_eq!(mine[0]["gst"], 36.0);
    assert_eq!(mine[0]["start_date"], "2025-01-10");
    assert_eq!(mine[0]["payment_method"], "card");

    let uri = format!("/api/bookings/{booking_id}/cancel");
    let (status, body) = client.send(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "cancelled");
    let (status, _) = client.send(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn bookings_are_private_to_their_owner(db: PgPool) {
    let mut alice = Client::new(db.clone()).await;
    alice.signup_and_login("alice", "a@x.com", "secret1").await;
    let (_, body) = alice
        .send(
            Method::POST,
            "/api/bookings",
            Some(json!({"options": {"guide": {"price": 50}}})),
        )
        .await;
    let booking_id = body["booking_id"].as_i64().unwrap();

    let mut bob = Client {
        app: alice.app.clone(),
        token: None,
    };
    bob.signup_and_login("bob", "b@x.com", "secret2").await;
    let (_, mine) = bob.send(Method::GET, "/api/bookings/my", None).await;
    assert!(mine.as_array().unwrap().is_empty());
    let (status, _) = bob
        .send(Method::POST, &format!("/api/bookings/{booking_id}/cancel"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn duplicate_signup_is_rejected_without_a_new_user(db: PgPool) {
    let mut client = Client::new(db.clone()).await;
    client.signup_and_login("alice", "a@x.com", "secret1").await;

    let (status, body) = client
        .send(
            Method::POST,
            "/signup",
            Some(json!({"username": "alice2", "email": "A@X.com", "password": "secret1"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered");

    let (status, _) = client
        .send(
            Method::POST,
            "/signup",
            Some(json!({"username": "alice", "email": "other@x.com", "password": "secret1"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(users, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn wrong_password_and_unknown_email_look_the_same(db: PgPool) {
    let mut client = Client::new(db).await;
    client.signup_and_login("alice", "a@x.com", "secret1").await;

    let (s1, b1) = client
        .send(Method::POST, "/login", Some(json!({"email": "a@x.com", "password": "wrong!!"})))
        .await;
    let (s2, b2) = client
        .send(Method::POST, "/login", Some(json!({"email": "z@x.com", "password": "secret1"})))
        .await;
    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s1, s2);
    assert_eq!(b1, b2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn logout_ends_the_session(db: PgPool) {
    let mut client = Client::new(db).await;
    client.signup_and_login("alice", "a@x.com", "secret1").await;

    let (status, me) = client.send(Method::GET, "/api/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");

    let (status, _) = client.send(Method::GET, "/logout", None).await;
    assert!(status.is_redirection());
    let (status, _) = client.send(Method::GET, "/api/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn reviews_keep_destination_rating_at_the_mean(db: PgPool) {
    let mut client = Client::new(db).await;
    client.signup_and_login("alice", "a@x.com", "secret1").await;
    let id = client.destination_id("Hampi").await;

    for rating in [0, 6] {
        let (status, _) = client
            .send(
                Method::POST,
                "/api/reviews",
                Some(json!({"destination_id": id, "rating": rating})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "rating {rating}");
    }

    let mut last = Value::Null;
    for rating in [5, 4, 4] {
        let (status, body) = client
            .send(
                Method::POST,
                "/api/reviews",
                Some(json!({"destination_id": id, "rating": rating, "comment": "lovely"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        last = body;
    }
    assert_eq!(last["destination_rating"], 4.33);

    let (_, details) = client.send(Method::GET, &format!("/api/destination/{id}"), None).await;
    assert_eq!(details["rating"], 4.33);
    assert_eq!(details["reviews"].as_array().unwrap().len(), 3);
    assert_eq!(details["reviews"][0]["user"], "alice");

    let (status, _) = client
        .send(Method::POST, "/api/reviews", Some(json!({"destination_id": 999999, "rating": 3})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn category_filter_and_name_sort(db: PgPool) {
    let client = Client::new(db).await;

    let (status, list) = client
        .send(Method::GET, "/api/destinations?category=Heritage&sort=name", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Hampi", "Jaipur", "Taj Mahal"]);

    let (_, all) = client.send(Method::GET, "/api/destinations?category=all", None).await;
    assert_eq!(all.as_array().unwrap().len(), 8);
    assert_eq!(all[0]["name"], "Taj Mahal");

    let (_, hits) = client.send(Method::GET, "/api/destinations?search=GOA", None).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let (_, states) = client.send(Method::GET, "/api/states", None).await;
    let up = states
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["state"] == "Uttar Pradesh")
        .unwrap();
    assert_eq!(up["count"], 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn weather_without_provider_degrades(db: PgPool) {
    let client = Client::new(db).await;
    let id = client.destination_id("Manali").await;

    let (status, body) = client.send(Method::GET, &format!("/api/weather/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"available": false, "message": "Weather data not available"}));

    let (status, _) = client.send(Method::GET, "/api/weather/999999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, recs) = client.send(Method::GET, "/api/weather-recommendations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(recs.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn plans_round_trip_and_chat_uses_faq(db: PgPool) {
    let mut client = Client::new(db).await;
    client.signup_and_login("alice", "a@x.com", "secret1").await;

    let (status, _) = client
        .send(
            Method::POST,
            "/api/plan/save",
            Some(json!({"destinations": [2, 1], "startDate": "2025-02-07", "endDate": "2025-02-01"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = client
        .send(
            Method::POST,
            "/api/plan/save",
            Some(json!({"destinations": [2, 1], "startDate": "2025-02-01", "endDate": "2025-02-07"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["plan_id"].as_i64().is_some());

    let (_, plans) = client.send(Method::GET, "/api/plan/my", None).await;
    assert_eq!(plans.as_array().unwrap().len(), 1);
    assert_eq!(plans[0]["destination_ids"], json!([2, 1]));

    let (status, answer) = client
        .send(Method::POST, "/api/chatbot", Some(json!({"message": "Can I get a refund?"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answer["source"], "faq");

    let (_, answer) = client
        .send(Method::POST, "/api/chatbot", Some(json!({"message": "Tell me about Hampi"})))
        .await;
    assert_eq!(answer["source"], "fallback");
}

async fn count_for_user(db: &PgPool, table: &str, user_id: i64) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE user_id = $1"))
        .bind(user_id)
        .fetch_one(db)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn deleting_an_account_removes_everything_it_owns(db: PgPool) {
    let mut alice = Client::new(db.clone()).await;
    alice.signup_and_login("alice", "a@x.com", "secret1").await;
    let (_, me) = alice.send(Method::GET, "/api/me", None).await;
    let alice_id = me["id"].as_i64().unwrap();
    let hampi = alice.destination_id("Hampi").await;

    let (status, _) = alice
        .send(Method::POST, "/api/bookings", Some(json!({"options": {"hotel": {"price": 80}}})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = alice
        .send(Method::POST, "/api/plan/save", Some(json!({"destinations": [hampi]})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = alice
        .send(Method::POST, "/api/reviews", Some(json!({"destination_id": hampi, "rating": 4})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut bob = Client {
        app: alice.app.clone(),
        token: None,
    };
    bob.signup_and_login("bob", "b@x.com", "secret2").await;
    let (status, _) = bob
        .send(Method::POST, "/api/bookings", Some(json!({"options": {"guide": {"price": 20}}})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    for table in ["bookings", "travel_plans", "reviews", "sessions"] {
        assert_eq!(count_for_user(&db, table, alice_id).await, 1, "{table}");
    }

    let (status, _) = alice.send(Method::DELETE, "/api/me", None).await;
    assert_eq!(status, StatusCode::OK);

    for table in ["bookings", "travel_plans", "reviews", "sessions"] {
        assert_eq!(count_for_user(&db, table, alice_id).await, 0, "{table}");
    }
    let (status, _) = alice.send(Method::GET, "/api/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, bobs) = bob.send(Method::GET, "/api/bookings/my", None).await;
    assert_eq!(bobs.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn concurrent_reviews_leave_the_exact_mean(db: PgPool) {
    let mut client = Client::new(db.clone()).await;
    client.signup_and_login("alice", "a@x.com", "secret1").await;
    let id = client.destination_id("Varanasi").await;

    let ratings: Vec<i64> = (0..12).map(|i| i % 5 + 1).collect();
    let mut tasks = Vec::new();
    for rating in ratings.clone() {
        let writer = Client {
            app: client.app.clone(),
            token: client.token.clone(),
        };
        tasks.push(tokio::spawn(async move {
            writer
                .send(
                    Method::POST,
                    "/api/reviews",
                    Some(json!({"destination_id": id, "rating": rating})),
                )
                .await
                .0
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::CREATED);
    }

    let mean = ratings.iter().sum::<i64>() as f64 / ratings.len() as f64;
    let expected = (mean * 100.0).round() / 100.0;
    let stored: f64 = sqlx::query_scalar("SELECT rating FROM destinations WHERE id = $1")
        .bind(id)
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(stored, expected);

    let reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE destination_id = $1")
        .bind(id)
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(reviews, ratings.len() as i64);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn login_clears_expired_sessions(db: PgPool) {
    let mut client = Client::new(db.clone()).await;
    client.signup_and_login("alice", "a@x.com", "secret1").await;
    let (_, me) = client.send(Method::GET, "/api/me", None).await;
    let user_id = me["id"].as_i64().unwrap();

    for _ in 0..3 {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, expires_at) VALUES ($1, $2, now() - interval '1 hour')",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(user_id)
        .execute(&db)
        .await
        .unwrap();
    }
    assert_eq!(count_for_user(&db, "sessions", user_id).await, 4);

    client.login("a@x.com", "secret1").await;

    let expired: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE expires_at <= now()")
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(expired, 0);
    assert_eq!(count_for_user(&db, "sessions", user_id).await, 2);
}
