//! In-memory implementation of every storage port, shared by the service tests.
//!
//! Each call computes its result synchronously under one lock, so the
//! version checks and multi-row writes behave atomically like the SQL adapter.

use std::collections::BTreeMap;
use std::future::{Future, ready};
use std::sync::{Arc, Mutex};

use inventory_domain::asset::{Asset, AssetStatus, NewAsset};
use inventory_domain::assignment::{Assignment, AssignmentDetails, AssignmentStatus};
use inventory_domain::employee::{Employee, NewEmployee};
use inventory_domain::error::{ConflictError, InvalidStateError, InventoryError, NotFoundError};
use inventory_domain::id::{AssetId, AssignmentId, EmployeeId, MaintenanceLogId, Version};
use inventory_domain::lifecycle::{
    AssetTransition, Checkin, Checkout, MaintenanceIntake, MaintenanceProgress,
};
use inventory_domain::maintenance::{MaintenanceDetails, MaintenanceLog};

use crate::ports::{
    AssetFilter, AssetRepository, AssignmentFilter, AssignmentRepository, EmployeeFilter,
    EmployeeRepository, HealthProbe, MaintenanceRepository,
};

#[derive(Default)]
struct State {
    next_id: i64,
    assets: BTreeMap<AssetId, Asset>,
    employees: BTreeMap<EmployeeId, Employee>,
    assignments: BTreeMap<AssignmentId, Assignment>,
    logs: BTreeMap<MaintenanceLogId, MaintenanceLog>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_transition(&self, transition: &AssetTransition) -> Result<(), InventoryError> {
        let asset = self
            .assets
            .get(&transition.asset_id)
            .ok_or_else(|| not_found("Asset", transition.asset_id))?;
        if asset.version != transition.expected_version {
            return Err(conflict("Asset", transition.asset_id));
        }
        Ok(())
    }

    fn apply_transition(&mut self, transition: &AssetTransition) {
        if let Some(asset) = self.assets.get_mut(&transition.asset_id) {
            asset.status = transition.status;
            asset.version = asset.version.next();
        }
    }

    fn assignment_details(&self, assignment: &Assignment) -> Option<AssignmentDetails> {
        Some(AssignmentDetails {
            assignment: assignment.clone(),
            asset: self.assets.get(&assignment.asset_id)?.clone(),
            employee: self.employees.get(&assignment.employee_id)?.clone(),
        })
    }

    fn maintenance_details(&self, log: &MaintenanceLog) -> Option<MaintenanceDetails> {
        Some(MaintenanceDetails {
            log: log.clone(),
            asset: self.assets.get(&log.asset_id)?.clone(),
        })
    }
}

fn not_found(entity: &'static str, id: impl ToString) -> InventoryError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}

fn conflict(entity: &'static str, id: impl ToString) -> InventoryError {
    ConflictError {
        entity,
        id: id.to_string(),
    }
    .into()
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// One shared store; clone it into every service under test.
#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    pub(crate) state: Arc<Mutex<State>>,
    pub(crate) unhealthy: bool,
}

impl InMemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Bump an asset's version behind the services' back.
    pub(crate) fn touch_asset(&self, id: AssetId) {
        self.with(|s| {
            if let Some(asset) = s.assets.get_mut(&id) {
                asset.version = asset.version.next();
            }
        });
    }

    pub(crate) fn assignment_count(&self) -> usize {
        self.with(|s| s.assignments.len())
    }

    pub(crate) fn log_count(&self) -> usize {
        self.with(|s| s.logs.len())
    }
}

impl AssetRepository for InMemoryStore {
    fn create(&self, asset: NewAsset) -> impl Future<Output = Result<Asset, InventoryError>> + Send {
        let created = self.with(|s| {
            let asset = asset.persisted(AssetId::new(s.next_id()));
            s.assets.insert(asset.id, asset.clone());
            asset
        });
        ready(Ok(created))
    }

    fn get_by_id(
        &self,
        id: AssetId,
    ) -> impl Future<Output = Result<Option<Asset>, InventoryError>> + Send {
        ready(Ok(self.with(|s| s.assets.get(&id).cloned())))
    }

    fn list(
        &self,
        filter: AssetFilter,
    ) -> impl Future<Output = Result<Vec<Asset>, InventoryError>> + Send {
        let assets = self.with(|s| {
            s.assets
                .values()
                .filter(|a| filter.status.is_none_or(|status| a.status == status))
                .cloned()
                .collect()
        });
        ready(Ok(assets))
    }

    fn update(&self, asset: Asset) -> impl Future<Output = Result<Asset, InventoryError>> + Send {
        let result = self.with(|s| {
            let stored = s.assets.get_mut(&asset.id).ok_or_else(|| not_found("Asset", asset.id))?;
            if stored.version != asset.version {
                return Err(conflict("Asset", asset.id));
            }
            let mut updated = asset;
            updated.version = updated.version.next();
            *stored = updated.clone();
            Ok(updated)
        });
        ready(result)
    }

    fn delete(
        &self,
        id: AssetId,
        expected: Version,
    ) -> impl Future<Output = Result<(), InventoryError>> + Send {
        let result = self.with(|s| {
            let stored = s.assets.get(&id).ok_or_else(|| not_found("Asset", id))?;
            if stored.version != expected {
                return Err(conflict("Asset", id));
            }
            s.assets.remove(&id);
            s.assignments.retain(|_, a| a.asset_id != id);
            s.logs.retain(|_, l| l.asset_id != id);
            Ok(())
        });
        ready(result)
    }
}

impl EmployeeRepository for InMemoryStore {
    fn create(
        &self,
        employee: NewEmployee,
    ) -> impl Future<Output = Result<Employee, InventoryError>> + Send {
        let created = self.with(|s| {
            let employee = employee.persisted(EmployeeId::new(s.next_id()));
            s.employees.insert(employee.id, employee.clone());
            employee
        });
        ready(Ok(created))
    }

    fn get_by_id(
        &self,
        id: EmployeeId,
    ) -> impl Future<Output = Result<Option<Employee>, InventoryError>> + Send {
        ready(Ok(self.with(|s| s.employees.get(&id).cloned())))
    }

    fn list(
        &self,
        filter: EmployeeFilter,
    ) -> impl Future<Output = Result<Vec<Employee>, InventoryError>> + Send {
        let mut employees: Vec<Employee> = self.with(|s| {
            s.employees
                .values()
                .filter(|e| {
                    filter.search.as_deref().is_none_or(|q| {
                        contains(&e.first_name, q)
                            || contains(&e.last_name, q)
                            || contains(&e.email, q)
                            || contains(&e.department, q)
                    })
                })
                .cloned()
                .collect()
        });
        employees.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
        ready(Ok(employees))
    }

    fn update(
        &self,
        employee: Employee,
    ) -> impl Future<Output = Result<Employee, InventoryError>> + Send {
        let result = self.with(|s| {
            let stored = s
                .employees
                .get_mut(&employee.id)
                .ok_or_else(|| not_found("Employee", employee.id))?;
            if stored.version != employee.version {
                return Err(conflict("Employee", employee.id));
            }
            let mut updated = employee;
            updated.version = updated.version.next();
            *stored = updated.clone();
            Ok(updated)
        });
        ready(result)
    }

    fn delete(&self, id: EmployeeId) -> impl Future<Output = Result<(), InventoryError>> + Send {
        let result = self.with(|s| {
            s.employees.remove(&id).ok_or_else(|| not_found("Employee", id))?;
            let held: Vec<AssetId> = s
                .assignments
                .values()
                .filter(|a| a.employee_id == id && a.status == AssignmentStatus::Active)
                .map(|a| a.asset_id)
                .collect();
            for asset_id in held {
                if let Some(asset) = s.assets.get_mut(&asset_id) {
                    asset.status = AssetStatus::Available;
                    asset.version = asset.version.next();
                }
            }
            s.assignments.retain(|_, a| a.employee_id != id);
            Ok(())
        });
        ready(result)
    }
}

impl AssignmentRepository for InMemoryStore {
    fn get_by_id(
        &self,
        id: AssignmentId,
    ) -> impl Future<Output = Result<Option<Assignment>, InventoryError>> + Send {
        ready(Ok(self.with(|s| s.assignments.get(&id).cloned())))
    }

    fn get_details(
        &self,
        id: AssignmentId,
    ) -> impl Future<Output = Result<Option<AssignmentDetails>, InventoryError>> + Send {
        let details = self.with(|s| {
            s.assignments
                .get(&id)
                .and_then(|a| s.assignment_details(a))
        });
        ready(Ok(details))
    }

    fn list(
        &self,
        filter: AssignmentFilter,
    ) -> impl Future<Output = Result<Vec<AssignmentDetails>, InventoryError>> + Send {
        let details = self.with(|s| {
            s.assignments
                .values()
                .rev()
                .filter_map(|a| s.assignment_details(a))
                .filter(|d| {
                    filter.search.as_deref().is_none_or(|q| {
                        contains(&d.asset.name, q) || contains(&d.employee.full_name(), q)
                    })
                })
                .collect()
        });
        ready(Ok(details))
    }

    fn find_by_asset(
        &self,
        asset_id: AssetId,
    ) -> impl Future<Output = Result<Vec<AssignmentDetails>, InventoryError>> + Send {
        let details = self.with(|s| {
            s.assignments
                .values()
                .rev()
                .filter(|a| a.asset_id == asset_id)
                .filter_map(|a| s.assignment_details(a))
                .collect()
        });
        ready(Ok(details))
    }

    fn open(
        &self,
        plan: Checkout,
    ) -> impl Future<Output = Result<Assignment, InventoryError>> + Send {
        let result = self.with(|s| {
            s.check_transition(&plan.asset)?;
            let taken = s.assignments.values().any(|a| {
                a.asset_id == plan.assignment.asset_id && a.status == AssignmentStatus::Active
            });
            if taken {
                return Err(InvalidStateError::AssetAlreadyAssigned {
                    asset_id: plan.assignment.asset_id.get(),
                }
                .into());
            }
            s.apply_transition(&plan.asset);
            let assignment = plan.assignment.persisted(AssignmentId::new(s.next_id()));
            s.assignments.insert(assignment.id, assignment.clone());
            Ok(assignment)
        });
        ready(result)
    }

    fn close(
        &self,
        plan: Checkin,
    ) -> impl Future<Output = Result<Assignment, InventoryError>> + Send {
        let result = self.with(|s| {
            let id = plan.assignment.id;
            let stored = s.assignments.get(&id).ok_or_else(|| not_found("Assignment", id))?;
            if stored.version != plan.assignment.version {
                return Err(conflict("Assignment", id));
            }
            s.check_transition(&plan.asset)?;
            s.apply_transition(&plan.asset);
            let mut closed = plan.assignment;
            closed.version = closed.version.next();
            s.assignments.insert(id, closed.clone());
            Ok(closed)
        });
        ready(result)
    }

    fn remove(
        &self,
        id: AssignmentId,
        asset: AssetTransition,
    ) -> impl Future<Output = Result<(), InventoryError>> + Send {
        let result = self.with(|s| {
            if !s.assignments.contains_key(&id) {
                return Err(not_found("Assignment", id));
            }
            s.check_transition(&asset)?;
            s.assignments.remove(&id);
            s.apply_transition(&asset);
            Ok(())
        });
        ready(result)
    }
}

impl MaintenanceRepository for InMemoryStore {
    fn get_by_id(
        &self,
        id: MaintenanceLogId,
    ) -> impl Future<Output = Result<Option<MaintenanceLog>, InventoryError>> + Send {
        ready(Ok(self.with(|s| s.logs.get(&id).cloned())))
    }

    fn get_details(
        &self,
        id: MaintenanceLogId,
    ) -> impl Future<Output = Result<Option<MaintenanceDetails>, InventoryError>> + Send {
        ready(Ok(self.with(|s| s.logs.get(&id).and_then(|l| s.maintenance_details(l)))))
    }

    fn list(&self) -> impl Future<Output = Result<Vec<MaintenanceDetails>, InventoryError>> + Send {
        let details = self.with(|s| {
            s.logs
                .values()
                .rev()
                .filter_map(|l| s.maintenance_details(l))
                .collect()
        });
        ready(Ok(details))
    }

    fn find_by_asset(
        &self,
        asset_id: AssetId,
    ) -> impl Future<Output = Result<Vec<MaintenanceLog>, InventoryError>> + Send {
        let logs = self.with(|s| {
            s.logs
                .values()
                .rev()
                .filter(|l| l.asset_id == asset_id)
                .cloned()
                .collect()
        });
        ready(Ok(logs))
    }

    fn open(
        &self,
        plan: MaintenanceIntake,
    ) -> impl Future<Output = Result<MaintenanceLog, InventoryError>> + Send {
        let result = self.with(|s| {
            if let Some(transition) = &plan.asset {
                s.check_transition(transition)?;
                s.apply_transition(transition);
            }
            let log = plan.log.persisted(MaintenanceLogId::new(s.next_id()));
            s.logs.insert(log.id, log.clone());
            Ok(log)
        });
        ready(result)
    }

    fn progress(
        &self,
        plan: MaintenanceProgress,
    ) -> impl Future<Output = Result<MaintenanceLog, InventoryError>> + Send {
        let result = self.with(|s| {
            let id = plan.log.id;
            let stored = s.logs.get(&id).ok_or_else(|| not_found("MaintenanceLog", id))?;
            if stored.version != plan.log.version {
                return Err(conflict("MaintenanceLog", id));
            }
            if let Some(transition) = &plan.asset {
                s.check_transition(transition)?;
                s.apply_transition(transition);
            }
            let mut updated = plan.log;
            updated.version = updated.version.next();
            s.logs.insert(id, updated.clone());
            Ok(updated)
        });
        ready(result)
    }
}

impl HealthProbe for InMemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn description(&self) -> &'static str {
        "in-memory store"
    }

    fn check(&self) -> impl Future<Output = Result<(), InventoryError>> + Send {
        let result = if self.unhealthy {
            Err(InventoryError::Storage("store offline".into()))
        } else {
            Ok(())
        };
        ready(result)
    }
}
