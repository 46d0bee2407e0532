use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    CreateMachineRequest, DeleteMachineRequest, GetMachineRequest, MachineTransformer,
    UpdateMachineStatusRequest,
};
use crate::response::MachinePresenter;
use application::service::{
    CreateMachineService, DeleteMachineService, GetMachineService, UpdateMachineStatusService,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use uuid::Uuid;

pub trait MachineRouter {
    fn route_machine(self) -> Self;
}

impl<D> MachineRouter for Router<AppModule<D>>
where
    D: GetMachineService + CreateMachineService + UpdateMachineStatusService + DeleteMachineService,
{
    fn route_machine(self) -> Self {
        self.route(
            "/machines",
            get(|State(handler): State<AppModule<D>>| async move {
                Controller::new((), MachinePresenter)
                    .bypass(|| handler.get_all_machines())
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(handler): State<AppModule<D>>,
                 req: Result<Json<CreateMachineRequest>, JsonRejection>| async move {
                    let Json(req) = req?;
                    Controller::new(MachineTransformer, MachinePresenter)
                        .intake(req)
                        .handle(|dto| handler.create_machine(dto))
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/machines/:id",
            get(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(MachineTransformer, MachinePresenter)
                        .intake(GetMachineRequest::new(id))
                        .handle(|dto| handler.get_machine(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(MachineTransformer, MachinePresenter)
                        .intake(DeleteMachineRequest::new(id))
                        .handle(|dto| handler.delete_machine(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/machines/:id/status",
            patch(
                |State(handler): State<AppModule<D>>,
                 Path(id): Path<Uuid>,
                 req: Result<Json<UpdateMachineStatusRequest>, JsonRejection>| async move {
                    let Json(req) = req?;
                    Controller::new(MachineTransformer, MachinePresenter)
                        .intake((id, req))
                        .handle(|dto| handler.update_machine_status(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
