// [apps/board-server/src/services/snapshot.rs]
/*!
 * =================================================================
 * APARATO: INITIAL STATE SNAPSHOT PROVIDER (V3.0 - RACE TOLERANT)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L4)
 * RESPONSABILIDAD: ENSAMBLE DEL ESTADO INICIAL PARA RECIÉN LLEGADOS
 *
 * # Mathematical Proof (Upsert Idempotence):
 * El ensamble no toma candado entre estratos: un TASK_CREATED que
 * compita con la conexión entrega al cliente o bien la instantánea sin
 * la tarea más su difusión, o bien la instantánea con la tarea ya
 * incluida. El store del cliente es idempotente bajo upsert, por lo
 * que ambas trayectorias convergen al mismo estado.
 * =================================================================
 */

use crate::state::AppState;
use syncboard_domain_models::{InitialStatePayload, ServerMessage};
use syncboard_infra_db::DbError;

/**
 * Ensambla la trama INITIAL_STATE con las tareas ordenadas por
 * (columna, posición) y la instantánea estable de presencia.
 */
pub async fn assemble_initial_state(
    application_state: &AppState,
) -> Result<ServerMessage, DbError> {
    let board_tasks = application_state.task_repository.get_all_tasks().await?;
    let presence_snapshot = application_state.presence_registry.get_all_users();

    Ok(ServerMessage::InitialState(InitialStatePayload {
        tasks: board_tasks,
        presence: presence_snapshot,
    }))
}
