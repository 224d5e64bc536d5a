//! Periodic room lifecycle sweep.
//!
//! Spawns a background task that loads every room the clock can still move,
//! runs the core lifecycle evaluation against "now", persists any advance,
//! and publishes `room.developed` for rooms that cross into `developed`.
//! The same tick applies the retention policy: developed rooms older than
//! the configured grace period are archived when their owner is not on the
//! premium tier.
//!
//! Handlers refresh rooms they touch anyway; the sweep exists so reveals
//! and notifications fire on time for rooms nobody is looking at.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use darkroom_core::room_lifecycle::{self, RoomStatus};
use darkroom_db::repositories::RoomRepo;
use darkroom_db::DbPool;
use darkroom_events::{DomainEvent, EventBus, EVENT_ROOM_ARCHIVED, EVENT_ROOM_DEVELOPED};
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Run the lifecycle sweep loop until `cancel` is triggered.
pub async fn run(
    pool: DbPool,
    bus: Arc<EventBus>,
    config: Arc<ServerConfig>,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = config.sweep_interval_secs,
        retention_grace_days = config.retention_grace_days,
        "Lifecycle sweeper started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.sweep_interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Lifecycle sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                sweep(&pool, &bus).await;
                apply_retention(&pool, &bus, config.retention_grace_days).await;
            }
        }
    }
}

/// One evaluation pass over every room the clock can still move.
async fn sweep(pool: &DbPool, bus: &EventBus) {
    let rows = match RoomRepo::list_due_for_evaluation(pool).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Lifecycle sweep: failed to list rooms");
            return;
        }
    };

    let now = Utc::now();
    let mut advanced = 0usize;

    for row in rows {
        let snapshot = match row.to_domain() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(room_id = row.id, error = %e, "Lifecycle sweep: bad room row");
                continue;
            }
        };

        let evaluated = room_lifecycle::evaluate(&snapshot, now);
        if evaluated == snapshot {
            continue;
        }

        if let Err(e) = RoomRepo::apply_lifecycle(pool, &evaluated).await {
            tracing::error!(room_id = evaluated.id, error = %e, "Lifecycle sweep: persist failed");
            continue;
        }
        advanced += 1;
        tracing::info!(
            room_id = evaluated.id,
            from = %snapshot.status,
            to = %evaluated.status,
            "Room lifecycle advanced"
        );

        if evaluated.status == RoomStatus::Developed && snapshot.status != RoomStatus::Developed {
            bus.publish(
                DomainEvent::new(EVENT_ROOM_DEVELOPED)
                    .with_source("room", evaluated.id)
                    .with_payload(serde_json::json!({
                        "room_id": evaluated.id,
                        "developed_at": evaluated.developed_at,
                    })),
            );
        }
    }

    if advanced > 0 {
        tracing::info!(advanced, "Lifecycle sweep: rooms advanced");
    } else {
        tracing::debug!("Lifecycle sweep: nothing to advance");
    }
}

/// Archive developed rooms past the retention grace period for non-premium
/// owners.
async fn apply_retention(pool: &DbPool, bus: &EventBus, grace_days: i64) {
    let cutoff = Utc::now() - chrono::Duration::days(grace_days);
    let rows = match RoomRepo::list_retention_candidates(pool, cutoff).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Retention: failed to list candidates");
            return;
        }
    };

    for row in rows {
        let archived = match row.to_domain().and_then(|s| room_lifecycle::archive(&s)) {
            Ok(archived) => archived,
            Err(e) => {
                tracing::error!(room_id = row.id, error = %e, "Retention: cannot archive room");
                continue;
            }
        };

        if let Err(e) = RoomRepo::apply_lifecycle(pool, &archived).await {
            tracing::error!(room_id = archived.id, error = %e, "Retention: persist failed");
            continue;
        }
        tracing::info!(room_id = archived.id, "Retention: room archived");

        bus.publish(
            DomainEvent::new(EVENT_ROOM_ARCHIVED)
                .with_source("room", archived.id)
                .with_payload(serde_json::json!({ "room_id": archived.id, "policy": "retention" })),
        );
    }
}
